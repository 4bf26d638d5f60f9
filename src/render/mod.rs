pub mod background;
pub mod blur;
pub mod colorize;
pub mod composite;
pub mod glyph;
pub mod mask;
pub mod perspective;
