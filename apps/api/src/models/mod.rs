pub mod job;
pub mod roadmap;
pub mod skill;
