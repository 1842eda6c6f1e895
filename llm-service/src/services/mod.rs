pub mod openrouter_service;
