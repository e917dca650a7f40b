mod dashboard;

pub use dashboard::SatisfactionDashboard;
