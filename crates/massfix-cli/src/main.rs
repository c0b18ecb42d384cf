use massfix_cli::cli;
use massfix_cli::input::Input;
use massfix_cli::runner::Runner;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::default()
        .filter_level(log::LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("MASSFIX_LOG", "error,massfix=info"))
        .init();

    let matches = cli::command().get_matches();

    if matches.get_flag("list-residues") {
        cli::list_residues();
        return Ok(());
    }

    let input = Input::from_arguments(matches)?;
    let runner = input.build().map(Runner::new)?;
    runner.run()?;

    Ok(())
}
