mod user_service;
