#![warn(missing_docs)]

//! Core library for folderview => See `folderview` crate.
//!
//! Contains the item model abstraction, selection handling, input events and
//! the minimal widget/layout contract the folder view surfaces build on.

pub use kurbo;
pub use nalgebra;

/// Contains useful types for interacting with winit.
pub mod window {
    pub use winit::event::{ElementState, MouseButton};
    pub use winit::keyboard::{Key, ModifiersState, NamedKey};
}

/// Contains pointer and key events delivered to widgets.
pub mod input;

/// Contains the single-slot box layout and size policies.
pub mod layout;

/// Contains the [ItemModel](model::ItemModel) trait and model indexes.
pub mod model;

/// Contains the [ItemSelectionModel](selection::ItemSelectionModel).
pub mod selection;

/// Contains the update mode bitflag.
pub mod update;

/// Contains the core widget functionalities.
pub mod widget;
