pub mod image_dir;

pub use image_dir::load_image_dataset;
