//! Arrangement strategies for distributing children along an axis

/// Trait implemented by arrangement strategies that distribute children on an axis.
pub trait Arrangement {
    /// Computes the position for each child given the available space and their sizes.
    fn arrange(&self, total_size: i32, sizes: &[i32], out_positions: &mut [i32]);
}

/// Linear arrangements for rows and columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LinearArrangement {
    /// Place children consecutively starting from the leading edge.
    #[default]
    Start,
    /// Place children so the last child touches the trailing edge.
    End,
    /// Place children so they are centered as a block.
    Center,
    /// Distribute the remaining space evenly between children.
    SpaceBetween,
    /// Distribute the remaining space before the first child, between children, and after the last child.
    SpaceEvenly,
    /// Insert a fixed number of pixels between children.
    SpacedBy(i32),
}

impl LinearArrangement {
    /// Creates an arrangement that inserts a fixed spacing between children.
    pub fn spaced_by(spacing: i32) -> Self {
        Self::SpacedBy(spacing)
    }

    /// Space consumed by the gaps themselves, independent of the container size.
    pub fn fixed_spacing(&self, count: usize) -> i32 {
        match *self {
            LinearArrangement::SpacedBy(spacing) if count > 1 => spacing * (count as i32 - 1),
            _ => 0,
        }
    }

    fn fill_positions(start: i32, gap: i32, sizes: &[i32], out_positions: &mut [i32]) {
        debug_assert_eq!(sizes.len(), out_positions.len());
        let mut cursor = start;
        for (size, position) in sizes.iter().zip(out_positions.iter_mut()) {
            *position = cursor;
            cursor += size + gap;
        }
    }
}

impl Arrangement for LinearArrangement {
    fn arrange(&self, total_size: i32, sizes: &[i32], out_positions: &mut [i32]) {
        debug_assert_eq!(sizes.len(), out_positions.len());
        if sizes.is_empty() {
            return;
        }

        let remaining = (total_size - sizes.iter().sum::<i32>()).max(0);
        let count = sizes.len() as i32;

        match *self {
            LinearArrangement::Start => Self::fill_positions(0, 0, sizes, out_positions),
            LinearArrangement::End => Self::fill_positions(remaining, 0, sizes, out_positions),
            LinearArrangement::Center => {
                Self::fill_positions(remaining / 2, 0, sizes, out_positions)
            }
            LinearArrangement::SpaceBetween => {
                let gap = if count <= 1 { 0 } else { remaining / (count - 1) };
                Self::fill_positions(0, gap, sizes, out_positions);
            }
            LinearArrangement::SpaceEvenly => {
                let gap = remaining / (count + 1);
                Self::fill_positions(gap, gap, sizes, out_positions);
            }
            LinearArrangement::SpacedBy(spacing) => {
                Self::fill_positions(0, spacing, sizes, out_positions);
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/arrangement_tests.rs"]
mod tests;
