pub mod anesthesia;
pub mod patient;
pub mod slice;
pub mod status;
pub mod timepoint;
