mod helpers;
mod session_flow;
mod translation_chain;
