pub mod aldrete;
pub mod ariscat;
pub mod caprini;
pub mod el_ganzouri;
pub mod las_vegas;
pub mod lee_rcri;
pub mod mmse;
pub mod qor15;
pub mod soba;
pub mod stop_bang;
