pub mod api;
pub mod core;

pub fn init_logging() {
    // try_init: 宿主应用或测试可能已经初始化过
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .try_init();
}
