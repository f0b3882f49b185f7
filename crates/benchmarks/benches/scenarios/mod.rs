pub mod single_client;
