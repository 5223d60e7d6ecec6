//! Grid container state: the item arena and its cached placement.
//!
//! Items live in document order behind stable [`ItemHandle`]s. The placement of
//! every item is computed on demand and thrown away as soon as anything that
//! feeds it changes.

use anyhow::{Result as GridResult, anyhow};

use crate::layout::{GridContainerInputs, GridLayoutResult, layout_placed_items};
use crate::line_resolution::GridCoordinate;
use crate::placement::{GridPlacement, place_grid_items};
use crate::track_sizing::GridAxisTracks;
use crate::types::{AvailableSpace, GridAutoFlow, GridItem, GridItemContent, ItemHandle};

/// A grid container and the items it owns.
#[derive(Debug, Clone, Default)]
pub struct GridContainer<NodeId = usize> {
    /// Items by handle; removed items leave a `None` so other handles stay valid
    items: Vec<Option<GridItem<NodeId>>>,
    inputs: GridContainerInputs,
    /// Coordinates of the live items, `None` while dirty
    placement: Option<GridPlacement>,
}

/// Live items with their handles, in document order.
fn live_items<NodeId>(
    items: &[Option<GridItem<NodeId>>],
) -> impl Iterator<Item = (ItemHandle, &GridItem<NodeId>)> {
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| Some((ItemHandle(index), item.as_ref()?)))
}

/// The cached placement, recomputed from `items` when the cache is empty.
fn cached_placement<'cache, NodeId>(
    cache: &'cache mut Option<GridPlacement>,
    items: &[Option<GridItem<NodeId>>],
    inputs: &GridContainerInputs,
) -> &'cache GridPlacement {
    cache.get_or_insert_with(|| {
        let placement = place_grid_items(
            live_items(items),
            &inputs.rows,
            &inputs.columns,
            inputs.auto_flow,
        );
        log::debug!(
            target: "css::grid::container",
            "placed {} items on a {}x{} grid",
            placement.len(),
            placement.topology.row_count(),
            placement.topology.column_count()
        );
        placement
    })
}

impl<NodeId: Clone> GridContainer<NodeId> {
    pub fn new(inputs: GridContainerInputs) -> Self {
        Self {
            items: Vec::new(),
            inputs,
            placement: None,
        }
    }

    pub const fn inputs(&self) -> &GridContainerInputs {
        &self.inputs
    }

    /// Replace every container input.
    pub fn set_inputs(&mut self, inputs: GridContainerInputs) {
        self.inputs = inputs;
        self.invalidate_placement("inputs changed");
    }

    /// Replace `grid-template-rows`, `grid-auto-rows`, `row-gap` and row names.
    pub fn set_rows(&mut self, rows: GridAxisTracks) {
        self.inputs.rows = rows;
        self.invalidate_placement("row tracks changed");
    }

    /// Replace `grid-template-columns`, `grid-auto-columns`, `column-gap` and
    /// column names.
    pub fn set_columns(&mut self, columns: GridAxisTracks) {
        self.inputs.columns = columns;
        self.invalidate_placement("column tracks changed");
    }

    pub fn set_auto_flow(&mut self, auto_flow: GridAutoFlow) {
        self.inputs.auto_flow = auto_flow;
        self.invalidate_placement("auto flow changed");
    }

    /// Change the available size. Placement does not depend on it and is kept.
    pub const fn set_available_size(&mut self, width: AvailableSpace, height: AvailableSpace) {
        self.inputs.available_width = width;
        self.inputs.available_height = height;
    }

    /// Append `item` in document order.
    pub fn add_item(&mut self, item: GridItem<NodeId>) -> ItemHandle {
        let handle = ItemHandle(self.items.len());
        self.items.push(Some(item));
        self.invalidate_placement("item added");
        handle
    }

    /// Replace the item behind `handle`.
    ///
    /// # Errors
    /// Returns an error if `handle` was never issued by this container or its item
    /// was removed.
    pub fn set_item(&mut self, handle: ItemHandle, item: GridItem<NodeId>) -> GridResult<()> {
        let slot = self.live_slot(handle)?;
        *slot = Some(item);
        self.invalidate_placement("item changed");
        Ok(())
    }

    /// Remove the item behind `handle` and return it.
    ///
    /// # Errors
    /// Returns an error if `handle` was never issued by this container or its item
    /// was already removed.
    pub fn remove_item(&mut self, handle: ItemHandle) -> GridResult<GridItem<NodeId>> {
        let item = self
            .live_slot(handle)?
            .take()
            .ok_or_else(|| anyhow!("grid item {handle:?} was already removed"))?;
        self.invalidate_placement("item removed");
        Ok(item)
    }

    /// Borrow the item behind `handle`.
    ///
    /// # Errors
    /// Returns an error if `handle` was never issued by this container or its item
    /// was removed.
    pub fn item(&self, handle: ItemHandle) -> GridResult<&GridItem<NodeId>> {
        self.items
            .get(handle.0)
            .ok_or_else(|| anyhow!("grid item {handle:?} does not belong to this container"))?
            .as_ref()
            .ok_or_else(|| anyhow!("grid item {handle:?} was removed"))
    }

    /// Live items with their handles, in document order.
    pub fn items(&self) -> impl Iterator<Item = (ItemHandle, &GridItem<NodeId>)> {
        live_items(&self.items)
    }

    /// Number of live items.
    pub fn item_count(&self) -> usize {
        self.items.iter().flatten().count()
    }

    /// Check if the cached placement was thrown away.
    pub const fn is_dirty(&self) -> bool {
        self.placement.is_none()
    }

    /// Drop the cached placement.
    pub fn invalidate_placement(&mut self, reason: &str) {
        if self.placement.take().is_some() {
            log::debug!(target: "css::grid::container", "placement invalidated: {reason}");
        }
    }

    /// Placement of every live item, computed if dirty.
    pub fn placement(&mut self) -> &GridPlacement {
        cached_placement(&mut self.placement, &self.items, &self.inputs)
    }

    /// The grid area of the item behind `handle`.
    ///
    /// # Errors
    /// Returns an error if `handle` was never issued by this container or its item
    /// was removed.
    pub fn coordinate(&mut self, handle: ItemHandle) -> GridResult<GridCoordinate> {
        self.item(handle)?;
        self.placement()
            .coordinate(handle)
            .ok_or_else(|| anyhow!("grid item {handle:?} has no grid area"))
    }

    /// Lay the grid out, placing items first if anything changed since last time.
    pub fn layout<C: GridItemContent + ?Sized>(
        &mut self,
        content: &mut C,
    ) -> GridLayoutResult<NodeId> {
        let placement = cached_placement(&mut self.placement, &self.items, &self.inputs);
        let items: Vec<_> = live_items(&self.items).collect();
        layout_placed_items(&items, placement, &self.inputs, content)
    }

    fn live_slot(&mut self, handle: ItemHandle) -> GridResult<&mut Option<GridItem<NodeId>>> {
        let slot = self
            .items
            .get_mut(handle.0)
            .ok_or_else(|| anyhow!("grid item {handle:?} does not belong to this container"))?;
        if slot.is_none() {
            return Err(anyhow!("grid item {handle:?} was removed"));
        }
        Ok(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_resolution::GridSpan;
    use crate::types::{GridPosition, GridTrackSize};

    fn two_columns() -> GridContainer {
        GridContainer::new(GridContainerInputs::new(
            GridAxisTracks::default(),
            GridAxisTracks::new(vec![GridTrackSize::length(50.0); 2], 0.0),
            AvailableSpace::Definite(100.0),
            AvailableSpace::Indefinite,
        ))
    }

    /// # Panics
    /// Panics if mutations do not invalidate the cached placement.
    #[test]
    fn mutations_invalidate_placement() {
        let mut container = two_columns();
        let first = container.add_item(GridItem::new(0));
        let second = container.add_item(GridItem::new(1));
        assert!(container.is_dirty());
        assert_eq!(
            container.coordinate(second).ok(),
            Some(GridCoordinate::new(GridSpan::new(0, 0), GridSpan::new(1, 1)))
        );
        assert!(!container.is_dirty());

        // Removing the first item lets the second one move up.
        assert!(container.remove_item(first).is_ok());
        assert!(container.is_dirty());
        assert_eq!(
            container.coordinate(second).ok(),
            Some(GridCoordinate::new(GridSpan::new(0, 0), GridSpan::new(0, 0)))
        );

        let pinned = GridItem::new(1).with_row(GridPosition::Line(3), GridPosition::Auto);
        assert!(container.set_item(second, pinned).is_ok());
        assert!(container.is_dirty());
        assert_eq!(
            container.coordinate(second).ok().map(|coordinate| coordinate.rows),
            Some(GridSpan::new(2, 2))
        );

        container.set_available_size(AvailableSpace::Definite(80.0), AvailableSpace::Indefinite);
        assert!(!container.is_dirty());
    }

    /// # Panics
    /// Panics if stale or foreign handles are accepted.
    #[test]
    fn unknown_handles_are_errors() {
        let mut container = two_columns();
        let handle = container.add_item(GridItem::new(0));
        assert!(container.item(ItemHandle(7)).is_err());
        assert!(container.coordinate(ItemHandle(7)).is_err());
        assert!(container.remove_item(handle).is_ok());
        assert!(container.remove_item(handle).is_err());
        assert!(container.item(handle).is_err());
        assert!(container.set_item(handle, GridItem::new(0)).is_err());
        assert_eq!(container.item_count(), 0);
    }
}
