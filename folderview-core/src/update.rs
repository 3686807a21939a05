use bitflags::bitflags;

bitflags! {
    /// Update bitflags to define which part of the widget tree should be refreshed.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Update: u8 {
        /// Redraw the widget.
        const DRAW = 0b0001;
        /// Recompute the layout of the widget and its children.
        const LAYOUT = 0b0010;
        /// Force a full refresh, even if nothing seems to have changed.
        const FORCE = 0b0100;
    }
}
