//! Publishing of account events to whatever consumes them downstream.

mod publisher;


pub use publisher::{
    publish_or_log, AccountEventPublisher, ChannelEventPublisher, EventPublishError,
    NoOpEventPublisher, TracingEventPublisher,
};
