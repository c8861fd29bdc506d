fn main() -> anyhow::Result<()> {
    machine_indexer::cli::run()
}
