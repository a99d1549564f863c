/// User interface module
///
/// - Flow-layout geometry for the photo grid (layout.rs)
/// - The iced grid view and rendering requests (grid.rs)

pub mod grid;
pub mod layout;
