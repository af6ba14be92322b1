// ─────────────────────────────────────────────────────────────────────────────
//  robobuild  —  cross-compilation build configuration
//
//  Selects a compiler profile for a target platform and build type,
//  resolves named third-party dependencies into concrete compiler/linker
//  inputs, gates artifacts on platform support, and emits a JSON build
//  plan for the build-graph engine.
//
//  USAGE
//  ─────
//    robobuild configure --platform beagle --build-type release
//    robobuild platforms
//    robobuild profile   --platform android --build-type debug
//    robobuild deps
//    robobuild deps freetype2
// ─────────────────────────────────────────────────────────────────────────────

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;

use robobuild::{
    build_artifact, BuildEnvironment, BuildType, CompilerProfile, DepRegistry, Manifest,
    PlanEngine, Platform,
};

// ─────────────────────────────────────────────────────────────────────────────
//  CLI definition (clap derive)
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name    = "robobuild",
    version = env!("CARGO_PKG_VERSION"),
    about   = "Cross-compilation build configuration for robotics targets",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Suppress informational output
    #[arg(long, global = true)]
    quiet: bool,

    /// Print the merged environment of every registered target
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Cmd {
    /// Configure the project and emit a build plan
    Configure(ConfigureArgs),
    /// List the supported target platforms and their toolchains
    Platforms,
    /// Print the resolved compiler profile for a platform/build type
    Profile(ProfileArgs),
    /// List registered dependencies, or show one dependency's platform table
    Deps {
        /// Dependency name
        name: Option<String>,
    },
}

#[derive(Args)]
struct ConfigureArgs {
    /// Target platform  (falls back to $ROBOBUILD_PLATFORM, then "native")
    #[arg(long, short = 'p')]
    platform: Option<String>,

    /// Build type: debug or release  (falls back to $ROBOBUILD_BUILD_TYPE,
    /// then "release")
    #[arg(long, short = 'b')]
    build_type: Option<String>,

    /// Project manifest
    #[arg(long, default_value = "robobuild.toml")]
    manifest: PathBuf,

    /// Where to write the JSON build plan
    #[arg(long, default_value = "build-plan.json")]
    out: PathBuf,
}

#[derive(Args)]
struct ProfileArgs {
    /// Target platform
    #[arg(long, short = 'p')]
    platform: Option<String>,

    /// Build type: debug or release
    #[arg(long, short = 'b')]
    build_type: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
//  Entry point
// ─────────────────────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    if cli.quiet {
        std::env::set_var("ROBOBUILD_QUIET", "1");
    }

    let result = match cli.command {
        Cmd::Configure(args) => cmd_configure(args, cli.verbose, cli.quiet),
        Cmd::Platforms       => { cmd_platforms(); Ok(()) }
        Cmd::Profile(args)   => cmd_profile(args),
        Cmd::Deps { name }   => cmd_deps(name.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
//  Command handlers
// ─────────────────────────────────────────────────────────────────────────────

fn cmd_configure(args: ConfigureArgs, verbose: bool, quiet: bool) -> anyhow::Result<()> {
    let platform = resolve_platform(args.platform)?;
    let build_type = resolve_build_type(args.build_type, quiet);

    if !quiet {
        println!(
            "{} {} {}",
            "Configuring".cyan().bold(),
            format!("[platform: {platform}]").dimmed(),
            format!(
                "[{}]",
                build_type.map(|b| b.as_str()).unwrap_or("no build type")
            )
            .dimmed(),
        );
        println!("{}", "─".repeat(60).dimmed());
    }

    let manifest = Manifest::load(&args.manifest)?;
    let root = args
        .manifest
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_owned();

    let profile = CompilerProfile::build(platform, build_type);
    let env = BuildEnvironment::compose(&profile);
    let registry = DepRegistry::builtin();

    let mut engine = PlanEngine::new();
    let mut registered = 0usize;
    let mut skipped = 0usize;

    for req in manifest.requests(&root) {
        match build_artifact(&mut engine, &registry, &env, &req)? {
            Some(handle) => {
                registered += 1;
                if !quiet {
                    println!(
                        "{}  {} {} {}",
                        "✓".green().bold(),
                        handle.name.bold(),
                        format!("→ {}", handle.output).cyan(),
                        format!("({}, {} sources)", handle.kind, req.sources.len()).dimmed(),
                    );
                }
                if verbose {
                    let target = &engine.targets()[handle.id];
                    eprintln!("  [env] fingerprint {}", target.env_fingerprint);
                    eprintln!("  [env] libs {}", target.libraries.join(" "));
                }
            }
            None => skipped += 1,
        }
    }

    engine
        .write_plan(&args.out)
        .with_context(|| format!("project '{}'", manifest.project.name))?;

    if !quiet {
        println!("{}", "─".repeat(60).dimmed());
        println!(
            "{} {} registered, {} skipped",
            "✓".green().bold(),
            registered,
            skipped,
        );
        println!("  {} {}", "plan:".dimmed(), args.out.display());
    }

    Ok(())
}

fn cmd_platforms() {
    println!(
        "{:<10} {:<32} {:<24} {}",
        "PLATFORM", "COMPILER", "DEFINES", "SYSROOT"
    );
    println!("{}", "─".repeat(95).dimmed());

    for platform in Platform::all() {
        let p = CompilerProfile::build(*platform, None);
        let defines = if p.defines.is_empty() {
            "—".to_owned()
        } else {
            p.defines.join(" ")
        };
        println!(
            "{:<10} {:<32} {:<24} {}",
            platform.as_str().bold(),
            p.command,
            defines,
            p.sysroot.dimmed(),
        );
    }
}

fn cmd_profile(args: ProfileArgs) -> anyhow::Result<()> {
    let platform = resolve_platform(args.platform)?;
    let build_type = resolve_build_type(args.build_type, false);

    let p = CompilerProfile::build(platform, build_type);

    println!(
        "{} {} {}",
        "Profile".cyan().bold(),
        format!("[platform: {platform}]").dimmed(),
        format!("[debug: {}]", p.is_debug).dimmed(),
    );
    println!("  {:<14} {}", "compiler:".dimmed(), p.command);
    println!("  {:<14} {}", "search path:".dimmed(), p.search_path.join(":"));
    println!("  {:<14} {}", "flags:".dimmed(), p.flags.join(" "));
    println!("  {:<14} {}", "defines:".dimmed(), p.defines.join(" "));
    println!("  {:<14} {}", "sysroot:".dimmed(), p.sysroot);
    for inc in &p.include_paths {
        println!("  {:<14} {}", "include:".dimmed(), inc);
    }
    for lp in &p.library_paths {
        println!("  {:<14} {}", "lib path:".dimmed(), lp);
    }
    if !p.library_names.is_empty() {
        println!("  {:<14} {}", "libs:".dimmed(), p.library_names.join(" "));
    }

    Ok(())
}

fn cmd_deps(name: Option<&str>) -> anyhow::Result<()> {
    let registry = DepRegistry::builtin();

    let Some(name) = name else {
        println!("{:<14}  {}", "DEPENDENCY", "PLATFORMS");
        println!("{}", "─".repeat(45).dimmed());
        for dep_name in registry.names() {
            let dep = registry.get(dep_name).unwrap();
            let platforms: Vec<&str> = dep
                .supported_platforms()
                .iter()
                .map(|p| p.as_str())
                .collect();
            println!("{:<14}  {}", dep_name.cyan(), platforms.join(", ").dimmed());
        }
        return Ok(());
    };

    let dep = registry
        .get(name)
        .ok_or_else(|| robobuild::ConfigError::UnknownDependency(name.to_owned()))?;

    println!("\n  {}", dep.name().bold().cyan());
    for platform in dep.supported_platforms() {
        let resolved = registry.resolve(name, platform)?;
        println!("\n  {}", platform.as_str().bold());
        print_list("includes", &resolved.include_paths);
        print_list("lib paths", &resolved.library_paths);
        print_list("libs", &resolved.library_names);
        print_list("runtime", &resolved.runtime_paths);
    }
    println!();

    Ok(())
}

fn print_list(label: &str, items: &[String]) {
    let rendered = if items.is_empty() {
        "—".to_owned()
    } else {
        items.join(", ")
    };
    println!("    {:<11} {}", format!("{label}:").dimmed(), rendered);
}

// ─────────────────────────────────────────────────────────────────────────────
//  Flag / env-var resolution
// ─────────────────────────────────────────────────────────────────────────────

fn resolve_platform(flag: Option<String>) -> robobuild::Result<Platform> {
    let name = flag
        .or_else(|| std::env::var("ROBOBUILD_PLATFORM").ok())
        .unwrap_or_else(|| "native".to_owned());
    name.parse()
}

/// Unknown build types warn and return `None`: the profile is then built
/// with neither debug nor release flags, matching how older configurations
/// treated a misspelled build type.
fn resolve_build_type(flag: Option<String>, quiet: bool) -> Option<BuildType> {
    let name = flag
        .or_else(|| std::env::var("ROBOBUILD_BUILD_TYPE").ok())
        .unwrap_or_else(|| "release".to_owned());

    match BuildType::parse_lenient(&name) {
        Some(bt) => Some(bt),
        None => {
            if !quiet {
                println!(
                    "{} unknown build type '{}': applying neither debug nor release flags",
                    "!".yellow().bold(),
                    name,
                );
            }
            None
        }
    }
}
