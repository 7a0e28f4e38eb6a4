use std::collections::HashSet;

use super::domain::{Employee, Position, PositionRef};

/// Repairs an employee's position references against the known position set.
///
/// Dangling references are dropped, duplicates collapse to their first
/// occurrence, and every surviving reference is canonicalized to the bare-id
/// form. A primary position that no longer names a held position is re-pointed
/// at the first held position, or cleared when nothing is held.
pub fn normalize_employee_positions(employee: &Employee, all_positions: &[Position]) -> Employee {
    let known_ids: HashSet<&str> = all_positions
        .iter()
        .map(|position| position.id.as_str())
        .collect();

    let mut seen: HashSet<&str> = HashSet::new();
    let positions: Vec<PositionRef> = employee
        .positions
        .iter()
        .filter(|held| known_ids.contains(held.id()) && seen.insert(held.id()))
        .map(|held| PositionRef::Id(held.id().to_string()))
        .collect();

    let primary_position = match &employee.primary_position {
        Some(primary) if positions.iter().any(|held| held.id() == primary.id()) => {
            Some(PositionRef::Id(primary.id().to_string()))
        }
        Some(_) => positions.first().cloned(),
        None => None,
    };

    Employee {
        positions,
        primary_position,
        ..employee.clone()
    }
}
