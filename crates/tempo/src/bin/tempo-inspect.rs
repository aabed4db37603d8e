fn main() -> anyhow::Result<()> {
    tempo::inspect::run()
}
