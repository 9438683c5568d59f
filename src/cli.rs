use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "zipseek")]
#[command(version)]
#[command(about = "List ZIP entries and stream them without extracting the archive", long_about = None)]
#[command(after_help = "Examples:\n  \
  zipseek bundle.zip                   list file entries in directory order\n  \
  zipseek -v bundle.zip                list entries with offsets and sizes\n  \
  zipseek bundle.zip bundle/aaa.txt    send bundle/aaa.txt to stdout\n\n\
  Set RUST_LOG=debug to trace Central Directory parsing.")]
pub struct Cli {
    /// ZIP file path
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Entries to write to stdout
    #[arg(value_name = "ENTRIES")]
    pub entries: Vec<String>,

    /// List files (short format)
    #[arg(short = 'l')]
    pub list: bool,

    /// List verbosely: offset, sizes and compression method
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Print a "--- name ---" marker before each entry
    #[arg(short = 'p')]
    pub print_names: bool,
}

impl Cli {
    pub fn is_listing(&self) -> bool {
        self.list || self.verbose || self.entries.is_empty()
    }
}
