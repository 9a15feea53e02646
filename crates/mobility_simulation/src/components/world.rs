//! World geometry для headless режима: SolidCells

use bevy::prelude::*;
use std::collections::HashSet;

use crate::mobility::WorldProbe;

/// Воксельный мир: множество твёрдых единичных клеток
///
/// Точка твёрдая ⇔ `floor(point)` в множестве. Reference реализация WorldProbe
/// для headless симуляции и тестов; настоящий host подставляет свои collision queries.
#[derive(Resource, Debug, Clone, Default)]
pub struct SolidCells {
    cells: HashSet<IVec3>,
}

impl SolidCells {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, cell: IVec3) {
        self.cells.insert(cell);
    }

    /// Вертикальная колонна клеток [y_min, y_max] в (x, z)
    pub fn fill_column(&mut self, x: i32, z: i32, y_min: i32, y_max: i32) {
        for y in y_min..=y_max {
            self.cells.insert(IVec3::new(x, y, z));
        }
    }

    pub fn contains(&self, cell: IVec3) -> bool {
        self.cells.contains(&cell)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell_of(point: Vec3) -> IVec3 {
        point.floor().as_ivec3()
    }
}

impl WorldProbe for SolidCells {
    fn is_solid(&self, point: Vec3) -> bool {
        self.contains(Self::cell_of(point))
    }
}
