/// Flow-layout geometry for the photo grid
///
/// Each section is a header followed by rows of square cells. Cells are
/// sized so `items_per_row` fit the width with equal gaps; the expanded
/// cell takes a row of its own and fills the width between the insets.

use crate::state::data::ItemAddress;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub items_per_row: u32,
    pub inset_top: f32,
    pub inset_left: f32,
    pub inset_bottom: f32,
    pub inset_right: f32,
    pub header_height: f32,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            items_per_row: 3,
            inset_top: 25.0,
            inset_left: 10.0,
            inset_bottom: 25.0,
            inset_right: 10.0,
            header_height: 50.0,
        }
    }
}

impl GridLayout {
    pub fn with_items_per_row(items_per_row: u32) -> Self {
        Self {
            items_per_row: items_per_row.max(1),
            ..Self::default()
        }
    }

    /// Gap between cells and between rows
    pub fn spacing(&self) -> f32 {
        self.inset_left
    }

    /// Side of a regular cell for a given content width
    pub fn item_side(&self, width: f32) -> f32 {
        let per_row = self.items_per_row.max(1) as f32;
        let padding = self.inset_left * (per_row + 1.0);
        ((width - padding) / per_row).floor().max(0.0)
    }

    /// Side of the expanded cell
    pub fn expanded_side(&self, width: f32) -> f32 {
        (width - self.inset_left - self.inset_right).max(0.0)
    }

    /// Photo indices per row for a section of `count` photos
    pub fn rows(&self, count: usize, expanded: Option<usize>) -> Vec<Vec<usize>> {
        let per_row = self.items_per_row.max(1) as usize;
        let mut rows = Vec::new();
        let mut row = Vec::with_capacity(per_row);

        for index in 0..count {
            if Some(index) == expanded {
                if !row.is_empty() {
                    rows.push(std::mem::take(&mut row));
                }
                rows.push(vec![index]);
                continue;
            }
            row.push(index);
            if row.len() == per_row {
                rows.push(std::mem::take(&mut row));
            }
        }
        if !row.is_empty() {
            rows.push(row);
        }
        rows
    }

    fn row_height(&self, row: &[usize], expanded: Option<usize>, width: f32) -> f32 {
        if row.len() == 1 && Some(row[0]) == expanded {
            self.expanded_side(width)
        } else {
            self.item_side(width)
        }
    }

    /// Height of a whole section including header and insets
    pub fn section_height(&self, count: usize, expanded: Option<usize>, width: f32) -> f32 {
        let rows = self.rows(count, expanded);
        let content: f32 = rows
            .iter()
            .map(|row| self.row_height(row, expanded, width))
            .sum();
        let gaps = rows.len().saturating_sub(1) as f32 * self.spacing();
        self.header_height + self.inset_top + content + gaps + self.inset_bottom
    }

    /// Top edge of an item within the scrolled content, `None` for an invalid address
    pub fn item_offset(
        &self,
        sections: &[usize],
        expanded: Option<ItemAddress>,
        address: ItemAddress,
        width: f32,
    ) -> Option<f32> {
        let count = *sections.get(address.group)?;
        if address.photo >= count {
            return None;
        }
        let expanded_in = |group: usize| {
            expanded
                .filter(|e| e.group == group)
                .map(|e| e.photo)
        };

        let mut y: f32 = sections[..address.group]
            .iter()
            .enumerate()
            .map(|(group, &count)| self.section_height(count, expanded_in(group), width))
            .sum();
        y += self.header_height + self.inset_top;

        let expanded_here = expanded_in(address.group);
        for row in self.rows(count, expanded_here) {
            if row.contains(&address.photo) {
                return Some(y);
            }
            y += self.row_height(&row, expanded_here, width) + self.spacing();
        }
        None
    }

    /// Scroll offset that centres an item vertically in the viewport
    pub fn scroll_target(
        &self,
        sections: &[usize],
        expanded: Option<ItemAddress>,
        address: ItemAddress,
        width: f32,
        viewport_height: f32,
    ) -> Option<f32> {
        let top = self.item_offset(sections, expanded, address, width)?;
        let side = if expanded == Some(address) {
            self.expanded_side(width)
        } else {
            self.item_side(width)
        };
        Some((top + side / 2.0 - viewport_height / 2.0).max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_side() {
        let layout = GridLayout::default();
        // 400 - 10 * 4 = 360, / 3
        assert_eq!(layout.item_side(400.0), 120.0);
        // floor((375 - 40) / 3) = floor(111.67)
        assert_eq!(layout.item_side(375.0), 111.0);
        assert_eq!(layout.item_side(20.0), 0.0);
        assert_eq!(layout.expanded_side(400.0), 380.0);
    }

    #[test]
    fn test_rows_without_expansion() {
        let layout = GridLayout::default();
        assert_eq!(
            layout.rows(7, None),
            vec![vec![0, 1, 2], vec![3, 4, 5], vec![6]]
        );
        assert!(layout.rows(0, None).is_empty());
    }

    #[test]
    fn test_expanded_item_gets_own_row() {
        let layout = GridLayout::default();
        assert_eq!(
            layout.rows(6, Some(1)),
            vec![vec![0], vec![1], vec![2, 3, 4], vec![5]]
        );
        assert_eq!(layout.rows(4, Some(0)), vec![vec![0], vec![1, 2, 3]]);
    }

    #[test]
    fn test_section_height() {
        let layout = GridLayout::default();
        // header 50 + top 25 + two rows of 120 + one gap 10 + bottom 25
        assert_eq!(layout.section_height(4, None, 400.0), 350.0);
        // empty section is header and insets only
        assert_eq!(layout.section_height(0, None, 400.0), 100.0);
        // rows [0] [1 expanded] [2]: 120 + 380 + 120 + 2 gaps
        assert_eq!(layout.section_height(3, Some(1), 400.0), 50.0 + 25.0 + 620.0 + 20.0 + 25.0);
    }

    #[test]
    fn test_item_offset_across_sections() {
        let layout = GridLayout::default();
        let sections = [4, 2];

        assert_eq!(
            layout.item_offset(&sections, None, ItemAddress::new(0, 0), 400.0),
            Some(75.0)
        );
        assert_eq!(
            layout.item_offset(&sections, None, ItemAddress::new(0, 3), 400.0),
            Some(75.0 + 130.0)
        );
        assert_eq!(
            layout.item_offset(&sections, None, ItemAddress::new(1, 1), 400.0),
            Some(350.0 + 75.0)
        );
        assert_eq!(layout.item_offset(&sections, None, ItemAddress::new(1, 2), 400.0), None);
        assert_eq!(layout.item_offset(&sections, None, ItemAddress::new(2, 0), 400.0), None);
    }

    #[test]
    fn test_scroll_target_centres_expanded() {
        let layout = GridLayout::default();
        let sections = [3];
        let expanded = ItemAddress::new(0, 1);

        // expanded row starts after row [0]: 75 + 120 + 10
        let target = layout
            .scroll_target(&sections, Some(expanded), expanded, 400.0, 600.0)
            .unwrap();
        assert_eq!(target, 205.0 + 190.0 - 300.0);

        let top = layout
            .scroll_target(&sections, Some(expanded), ItemAddress::new(0, 0), 400.0, 600.0)
            .unwrap();
        assert_eq!(top, 0.0);
    }
}
