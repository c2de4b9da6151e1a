use crate::cli::{Args, Command, Settings};
use anyhow::Context;
use clap::Parser;
use laderr::io::{parse_format, save_graph, serialize_graph};
use laderr::{LaderrConfig, Pipeline};
use std::io::{stdout, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;

pub fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "laderr=info,laderr_shacl=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = Args::parse();
    match matches.command {
        Command::Validate {
            file,
            settings,
            strict,
            inference,
            schema,
            shapes,
        } => {
            let mut config = load_config(&settings)?;
            if strict {
                config.allow_warnings = false;
                config.allow_infos = false;
            }
            if let Some(inference) = inference {
                config.inference = inference;
            }
            if schema.is_some() {
                config.schema_path = schema;
            }
            if shapes.is_some() {
                config.shapes_dir = shapes;
            }
            let validation = Pipeline::new(config)
                .run(&file)
                .with_context(|| format!("Failed to validate {}", file.display()))?;
            Ok(if validation.conforms() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Build { file, settings } => {
            let config = load_config(&settings)?;
            let specification = Pipeline::new(config.clone())
                .build_graph(&file)
                .with_context(|| format!("Failed to build the graph of {}", file.display()))?;
            if settings.output.is_some() {
                save_graph(
                    &specification.graph,
                    &specification.base,
                    config.output_format()?,
                    &config.output_path,
                )
                .with_context(|| format!("Failed to write {}", config.output_path.display()))?;
            } else {
                let format = match &config.output_format {
                    Some(format) => parse_format(format)?,
                    None => laderr::io::GraphFormat::Turtle,
                };
                serialize_graph(
                    &specification.graph,
                    &specification.base,
                    format,
                    stdout().lock(),
                )?
                .flush()?;
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Reads the configuration file if any and applies the output settings on top of it.
fn load_config(settings: &Settings) -> anyhow::Result<LaderrConfig> {
    let mut config = match &settings.config {
        Some(path) => LaderrConfig::from_toml_file(path)
            .with_context(|| format!("Failed to read the configuration {}", path.display()))?,
        None => LaderrConfig::default(),
    };
    if let Some(output) = &settings.output {
        config.output_path.clone_from(output);
    }
    if let Some(format) = &settings.format {
        config.output_format = Some(format.clone());
    }
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::panic_in_result_fn)]
mod tests {
    use super::*;
    use anyhow::Result;
    use assert_cmd::Command;
    use assert_fs::prelude::*;
    use assert_fs::TempDir;
    use predicates::prelude::*;

    const SPEC: &str = r#"
title = "Widgets"
createdBy = "A"

[Widget.W1]
label = "first"
"#;

    fn cli_command() -> Command {
        let mut command = Command::new(env!("CARGO"));
        command.arg("run").arg("--bin").arg("laderr").arg("--");
        command
    }

    #[test]
    fn cli_help() {
        cli_command()
            .assert()
            .failure()
            .stdout("")
            .stderr(predicate::str::contains("LaDeRR"));
    }

    #[test]
    fn cli_validate_conforming() -> Result<()> {
        let dir = TempDir::new()?;
        let spec = dir.child("spec.toml");
        spec.write_str(SPEC)?;
        let output = dir.child("out").child("spec.ttl");
        cli_command()
            .arg("validate")
            .arg(spec.path())
            .arg("--output")
            .arg(output.path())
            .assert()
            .success()
            .stderr(predicate::str::contains("The LaDeRR specification is correct"));
        output.assert(predicate::str::contains(":W1"));
        Ok(())
    }

    #[test]
    fn cli_validate_non_conforming() -> Result<()> {
        let dir = TempDir::new()?;
        let spec = dir.child("spec.toml");
        spec.write_str("description = \"no title\"")?;
        cli_command()
            .arg("validate")
            .arg(spec.path())
            .arg("--output")
            .arg(dir.child("result.ttl").path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("MinCountConstraintComponent"));
        Ok(())
    }

    #[test]
    fn cli_validate_with_config_and_shapes() -> Result<()> {
        let dir = TempDir::new()?;
        dir.child("shapes/widget.ttl").write_str(
            "@prefix sh: <http://www.w3.org/ns/shacl#> .
            @prefix laderr: <https://w3id.org/pedropaulofb/laderr#> .
            laderr:WidgetShape sh:targetClass laderr:Widget ;
                sh:property [ sh:path laderr:weight ; sh:minCount 1 ; sh:severity sh:Warning ] .",
        )?;
        let config = dir.child("laderr.toml");
        config.write_str(&format!(
            "shapes_dir = {:?}\noutput_path = {:?}\n",
            dir.child("shapes").path().display().to_string(),
            dir.child("result.nt").path().display().to_string()
        ))?;
        let spec = dir.child("spec.toml");
        spec.write_str(SPEC)?;

        cli_command()
            .arg("validate")
            .arg(spec.path())
            .arg("--config")
            .arg(config.path())
            .assert()
            .success();
        dir.child("result.nt")
            .assert(predicate::str::contains("<https://laderr.laderr#W1>"));

        cli_command()
            .arg("validate")
            .arg(spec.path())
            .arg("--config")
            .arg(config.path())
            .arg("--strict")
            .assert()
            .failure();
        Ok(())
    }

    #[test]
    fn cli_validate_missing_file() {
        cli_command()
            .arg("validate")
            .arg("does-not-exist.toml")
            .assert()
            .failure()
            .stderr(predicate::str::contains("does not exist"));
    }

    #[test]
    fn cli_build_to_stdout() -> Result<()> {
        let spec = assert_fs::NamedTempFile::new("spec.toml")?;
        spec.write_str(SPEC)?;
        cli_command()
            .arg("build")
            .arg(spec.path())
            .arg("--format")
            .arg("nt")
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "<https://laderr.laderr#LaderrSpecification> <https://w3id.org/pedropaulofb/laderr#composedOf> <https://laderr.laderr#W1> .",
            ));
        Ok(())
    }

    #[test]
    fn cli_build_structure_error() -> Result<()> {
        let spec = assert_fs::NamedTempFile::new("spec.toml")?;
        spec.write_str("title = \"T\"\n[Widget]\nW1 = 1\n")?;
        cli_command()
            .arg("build")
            .arg(spec.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("Widget.W1"));
        Ok(())
    }

    #[test]
    fn clap_debug() {
        use clap::CommandFactory;

        Args::command().debug_assert()
    }
}
