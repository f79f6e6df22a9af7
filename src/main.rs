fn main() -> anyhow::Result<()> {
    env_logger::init();
    fqlens::gui::run()
}
