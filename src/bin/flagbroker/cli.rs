//! Command-line surface (§6).

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "flagbroker", about = "A compile-and-link flag broker for C/C++ modules")]
pub struct Cli {
    /// Module names, optionally interspersed with version comparisons
    /// (e.g. `foo >= 1.2 bar`).
    pub packages: Vec<String>,

    /// Print the tool's own version and exit.
    #[arg(long)]
    pub version: bool,

    /// Print each requested module's version, one per line.
    #[arg(long)]
    pub modversion: bool,

    /// Print compiler flags (`-I` and other Cflags).
    #[arg(long)]
    pub cflags: bool,

    /// Print only `-I` flags.
    #[arg(long = "cflags-only-I")]
    pub cflags_only_i: bool,

    /// Print Cflags fragments that are not `-I`.
    #[arg(long = "cflags-only-other")]
    pub cflags_only_other: bool,

    /// Print linker flags (`-l`, `-L`, and other Libs).
    #[arg(long)]
    pub libs: bool,

    /// Print only `-l` flags.
    #[arg(long = "libs-only-l")]
    pub libs_only_l: bool,

    /// Print only `-L` flags.
    #[arg(long = "libs-only-L")]
    pub libs_only_big_l: bool,

    /// Print Libs fragments that are not `-l`/`-L`.
    #[arg(long = "libs-only-other")]
    pub libs_only_other: bool,

    /// Print the value of a variable from the first requested module.
    #[arg(long)]
    pub variable: Option<String>,

    /// List every module found on the search path.
    #[arg(long = "list-all")]
    pub list_all: bool,

    /// Exit 0 iff every requested module exists and satisfies its constraint.
    #[arg(long)]
    pub exists: bool,

    /// Exit 0 iff every requested module was found via a `-uninstalled.pc` file.
    #[arg(long)]
    pub uninstalled: bool,

    /// Exit 0 iff the module's version is at least `V`.
    #[arg(long = "atleast-version")]
    pub atleast_version: Option<String>,

    /// Exit 0 iff the module's version is exactly `V`.
    #[arg(long = "exact-version")]
    pub exact_version: Option<String>,

    /// Exit 0 iff the module's version is at most `V`.
    #[arg(long = "max-version")]
    pub max_version: Option<String>,

    /// Exit 0 iff this tool's own version is at least `V`.
    #[arg(long = "atleast-pkgconfig-version")]
    pub atleast_broker_version: Option<String>,

    /// Force verbose error printing regardless of query kind.
    #[arg(long = "print-errors")]
    pub print_errors: bool,

    /// Suppress verbose error printing for printing queries.
    #[arg(long = "silence-errors")]
    pub silence_errors: bool,

    /// Print error output to stdout instead of stderr.
    #[arg(long = "errors-to-stdout")]
    pub errors_to_stdout: bool,

    /// Enable debug-spew diagnostics and force verbose errors.
    #[arg(long)]
    pub debug: bool,

    /// Define (or override) a global variable: `NAME=VALUE`. Repeatable.
    #[arg(long = "define-variable", value_name = "NAME=VALUE")]
    pub define_variable: Vec<String>,

    /// Do not apply the per-file `prefix` auto-override.
    #[arg(long = "dont-define-prefix")]
    pub dont_define_prefix: bool,

    /// Use a different variable name for the auto-override (default `prefix`).
    #[arg(long = "prefix-variable")]
    pub prefix_variable: Option<String>,

    /// Emit flags using MSVC linker/compiler syntax.
    #[arg(long = "msvc-syntax")]
    pub msvc_syntax: bool,

    /// Also walk `Requires.private` and include `.private` fragments.
    #[arg(long)]
    pub r#static: bool,
}
