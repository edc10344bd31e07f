pub mod aggregator;
pub mod color;
pub mod command;
pub mod composer;
pub mod detections;
pub mod feature;
pub mod observation;
pub mod pixel;
pub mod plurals;
pub mod position;
pub mod window;
