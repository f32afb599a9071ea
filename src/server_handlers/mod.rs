pub mod catalogo;
pub mod configuracion;
pub mod docs;
pub mod editor;
pub mod vistas;

pub use catalogo::*;
pub use configuracion::*;
pub use docs::*;
pub use editor::*;
pub use vistas::*;
