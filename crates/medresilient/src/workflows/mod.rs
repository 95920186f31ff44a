pub mod resupply;
