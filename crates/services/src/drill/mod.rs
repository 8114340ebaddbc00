mod service;
mod view;

pub use service::DrillService;
pub use view::DrillSnapshot;
