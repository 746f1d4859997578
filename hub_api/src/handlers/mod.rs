pub mod campaigns;
pub mod creatives;
pub mod health;
pub mod sheets;
