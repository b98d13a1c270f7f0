pub mod mix_session;
