mod settings;

pub use settings::{
    CooldownConfig, DispatchConfig, PushConfig, ServerConfig, Settings, VapidConfig,
};
