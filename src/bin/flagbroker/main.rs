//! flagbroker CLI driver.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::Cli;
use flagbroker::core::registry::Registry;
use flagbroker::core::requirement::parse_requirement_list;
use flagbroker::core::version::Comparison;
use flagbroker::resolver;
use flagbroker::util::diagnostic::{emit, emit_error, BrokerError, Diagnostic};
use flagbroker::{aggregate, render, FlagSelector, GlobalContext};

const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("flagbroker=debug")
    } else {
        EnvFilter::new("flagbroker=warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    std::process::exit(run(cli));
}

fn run(cli: Cli) -> i32 {
    let mut ctx = GlobalContext::from_env();
    ctx.define_prefix = !cli.dont_define_prefix;
    if let Some(var) = &cli.prefix_variable {
        ctx.prefix_variable = var.clone();
    }
    ctx.msvc_syntax = cli.msvc_syntax;
    ctx.print_errors = ctx.print_errors || cli.print_errors;
    ctx.silence_errors = cli.silence_errors;
    ctx.errors_to_stdout = cli.errors_to_stdout;
    ctx.debug = ctx.debug || cli.debug;
    ctx.static_closure = cli.r#static;

    for entry in &cli.define_variable {
        match entry.split_once('=') {
            Some((name, value)) => ctx.define_variable(name, value),
            None => {
                report(&ctx, false, &BrokerError::BadOption { option: format!("--define-variable={}", entry) });
                return 1;
            }
        }
    }

    if ctx.debug {
        emit(&Diagnostic::debug(format!("search path: {:?}", ctx.search_path)));
    }

    // Short-circuit queries that need no package lookup at all.
    if cli.version {
        println!("{}", TOOL_VERSION);
        return 0;
    }
    if let Some(want) = &cli.atleast_broker_version {
        return bool_exit(Comparison::GreaterEqual.test(TOOL_VERSION, want));
    }
    if cli.list_all {
        let registry = Registry::new();
        for (key, name, description) in registry.list_all(&ctx) {
            println!("{:<20} {} - {}", key, name, description);
        }
        return 0;
    }

    let is_printing_query = cli.modversion
        || cli.cflags
        || cli.cflags_only_i
        || cli.cflags_only_other
        || cli.libs
        || cli.libs_only_l
        || cli.libs_only_big_l
        || cli.libs_only_other
        || cli.variable.is_some();

    let joined = cli.packages.join(" ");
    let seeds = match parse_requirement_list(&joined) {
        Ok(s) if !s.is_empty() => s,
        Ok(_) => {
            report(&ctx, is_printing_query, &BrokerError::BadOption { option: "missing package name".to_string() });
            return 1;
        }
        Err(reason) => {
            report(
                &ctx,
                is_printing_query,
                &BrokerError::BadRequirement { text: joined, reason },
            );
            return 1;
        }
    };

    let registry = Registry::new();

    if cli.modversion {
        let mut ok = true;
        for seed in &seeds {
            match registry.load(seed.name.as_str(), &ctx) {
                Ok(pkg) => println!("{}", pkg.version),
                Err(e) => {
                    report(&ctx, true, &e);
                    ok = false;
                }
            }
        }
        return if ok { 0 } else { 1 };
    }

    if let Some(name) = &cli.variable {
        let pkg = match registry.load(seeds[0].name.as_str(), &ctx) {
            Ok(pkg) => pkg,
            Err(e) => {
                report(&ctx, true, &e);
                return 1;
            }
        };
        let value = ctx.lookup_global(name).or_else(|| pkg.variables.get(name).map(String::as_str));
        println!("{}", value.unwrap_or(""));
        return 0;
    }

    if let Some(want) = &cli.atleast_version {
        return first_package_version_check(&registry, &ctx, &seeds, Comparison::GreaterEqual, want);
    }
    if let Some(want) = &cli.exact_version {
        return first_package_version_check(&registry, &ctx, &seeds, Comparison::Equal, want);
    }
    if let Some(want) = &cli.max_version {
        return first_package_version_check(&registry, &ctx, &seeds, Comparison::LessEqual, want);
    }

    if cli.uninstalled {
        return match resolver::resolve(&seeds, &registry, &ctx, false) {
            Ok(closure) => bool_exit(closure.iter().all(|p| p.uninstalled)),
            Err(e) => {
                report(&ctx, false, &e);
                1
            }
        };
    }

    if cli.exists {
        return match resolver::resolve(&seeds, &registry, &ctx, ctx.static_closure) {
            Ok(_) => 0,
            Err(e) => {
                report(&ctx, false, &e);
                1
            }
        };
    }

    let selector = if cli.cflags_only_i {
        Some(FlagSelector::IncludeDirs)
    } else if cli.cflags_only_other {
        Some(FlagSelector::CflagsOther)
    } else if cli.cflags {
        Some(FlagSelector::AllCflags)
    } else if cli.libs_only_l {
        Some(FlagSelector::Libs)
    } else if cli.libs_only_big_l {
        Some(FlagSelector::LibDirs)
    } else if cli.libs_only_other {
        Some(FlagSelector::LibsOther)
    } else if cli.libs {
        Some(FlagSelector::AllLibs)
    } else {
        None
    };

    let Some(selector) = selector else {
        report(&ctx, false, &BrokerError::BadOption { option: "no query flag given".to_string() });
        return 1;
    };

    match resolver::resolve(&seeds, &registry, &ctx, ctx.static_closure) {
        Ok(closure) => {
            let fragments = aggregate(&closure, selector, ctx.static_closure);
            let line = render(&fragments, ctx.msvc_syntax);
            if !line.is_empty() {
                println!("{}", line);
            }
            0
        }
        Err(e) => {
            report(&ctx, true, &e);
            1
        }
    }
}

fn first_package_version_check(
    registry: &Registry,
    ctx: &GlobalContext,
    seeds: &[flagbroker::RequiredVersion],
    comparison: Comparison,
    want: &str,
) -> i32 {
    match registry.load(seeds[0].name.as_str(), ctx) {
        Ok(pkg) => bool_exit(comparison.test(&pkg.version, want)),
        Err(e) => {
            report(ctx, false, &e);
            1
        }
    }
}

fn bool_exit(ok: bool) -> i32 {
    if ok {
        0
    } else {
        1
    }
}

/// Print `err` per the §4.5/§7 verbosity policy.
fn report(ctx: &GlobalContext, is_printing_query: bool, err: &BrokerError) {
    let verbose = if is_printing_query {
        ctx.verbose_for_printing_query()
    } else {
        ctx.verbose_for_predicate_query()
    };
    if verbose {
        emit_error(err, ctx.errors_to_stdout);
    }
}

