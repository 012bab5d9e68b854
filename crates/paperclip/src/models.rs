//! These models represent the objects passed around by the agent
//!
//! There are several different related formats we need to interact with:
//! - openai chat completion messages/tools, sent from the agent to the LLM
//! - anthropic messages/tools, sent from the agent to the LLM
//! - tool calls, sent from the agent to the local tools
//!
//! The provider adapters immediately convert between those wire formats and the
//! internal structs here. The internal models match neither vendor exactly.
pub mod message;
pub mod role;
pub mod tool;
