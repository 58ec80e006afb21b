pub mod policy;
pub mod reports;
pub mod simulation;
pub mod tester;

pub use policy::{GuessPolicy, SpendPolicy};
pub use simulation::{Simulation, SimulationPlan, SimulationSummary};
pub use tester::*;
