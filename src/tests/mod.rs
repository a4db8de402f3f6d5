// chat-overlay-translator/src/tests/mod.rs

// Testes do pipeline completo com captura, OCR e tradução falsos
mod scheduler_tests;
