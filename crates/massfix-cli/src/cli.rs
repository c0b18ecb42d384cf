use clap::{value_parser, Arg, Command, ValueHint};
use massfix_core::tables::{ResidueTable, TerminusTable};

pub fn command() -> Command {
    Command::new("massfix")
        .version(clap::crate_version!())
        .author("Sam Scherer, Tyler Jones")
        .about(
            "\u{2696} MassFix - Explain differences between the expected and observed \
             masses of synthetic peptides",
        )
        .arg(
            Arg::new("parameters")
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .help("Path to configuration parameters (JSON file)")
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("sequence")
                .short('s')
                .long("sequence")
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .help(
                    "Expected peptide sequence. Overrides the queries listed in the \
                     configuration file.",
                )
                .value_hint(ValueHint::Other),
        )
        .arg(
            Arg::new("observed")
                .long("observed")
                .requires("sequence")
                .value_parser(value_parser!(f32))
                .help("Observed mass of the peptide given with `--sequence`")
                .value_hint(ValueHint::Other),
        )
        .arg(
            Arg::new("n_terminus")
                .short('n')
                .long("n-terminus")
                .requires("sequence")
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .help("Chemical species at the N-terminus (default = H)")
                .value_hint(ValueHint::Other),
        )
        .arg(
            Arg::new("c_terminus")
                .short('c')
                .long("c-terminus")
                .requires("sequence")
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .help("Chemical species at the C-terminus (default = OH)")
                .value_hint(ValueHint::Other),
        )
        .arg(
            Arg::new("confidence")
                .long("confidence")
                .value_parser(value_parser!(f32))
                .help(
                    "Confidence of the observed mass, in Da. Overrides the confidence \
                     specified in the configuration file.",
                )
                .value_hint(ValueHint::Other),
        )
        .arg(
            Arg::new("output_directory")
                .short('o')
                .long("output_directory")
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .help(
                    "Path where results will be written. Overrides the directory \
                     specified in the configuration file.",
                )
                .value_hint(ValueHint::DirPath),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .value_parser(value_parser!(u64).range(1..))
                .help("Give up on a query after this many seconds")
                .value_hint(ValueHint::Other),
        )
        .arg(
            Arg::new("list-residues")
                .long("list-residues")
                .action(clap::ArgAction::SetTrue)
                .help("Print the predefined residues and terminal species, then exit"),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Written by {author-with-newline}Version {version}\n\n\
             {all-args}{after-help}",
        )
}

/// Print the bundled lookup tables
pub fn list_residues() {
    let residues = ResidueTable::bundled();
    println!("Symbol\tMass\t\tName");
    for (symbol, residue) in residues.iter() {
        let flag = if residue.non_canonical { " (non-canonical)" } else { "" };
        println!("{}\t{}\t{}{}", symbol, residue.mass, residue.name, flag);
    }

    let termini = TerminusTable::bundled();
    println!("\nTerminal species:");
    println!("{}", termini.species().collect::<Vec<_>>().join(", "));
}
