// Player profile: stats, mastery and class tier, the work-log tasks that grow
// them, and the self-reported salary with its proof.
// Profiles live in an in-memory session store; there is no durable copy.

pub mod handlers;
pub mod models;
pub mod progression;
pub mod store;
