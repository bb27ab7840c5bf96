mod common;

use env2cfg_core::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;

#[test]
fn render_prints_to_stdout_from_environment() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let template = tmp.path().join("config.yml.tpl");
	std::fs::write(
		&template,
		"mqtt:\n  broker: tcp://${ENV2CFG_HOST}:${ENV2CFG_PORT}\n",
	)?;

	common::env2cfg_cmd()
		.env("ENV2CFG_HOST", "broker")
		.env("ENV2CFG_PORT", "1883")
		.arg(&template)
		.assert()
		.success()
		.stdout("mqtt:\n  broker: tcp://broker:1883\n")
		.stderr(predicates::str::is_empty());

	Ok(())
}

#[test]
fn render_prefers_command_line_variables() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let template = tmp.path().join("config.tpl");
	std::fs::write(&template, "value=${ENV2CFG_VALUE}\n")?;

	common::env2cfg_cmd()
		.env("ENV2CFG_VALUE", "from-env")
		.arg("-e")
		.arg("ENV2CFG_VALUE=first")
		.arg("--vars")
		.arg("ENV2CFG_VALUE=from-cli")
		.arg(&template)
		.assert()
		.success()
		.stdout("value=from-cli\n");

	Ok(())
}

#[test]
fn render_reads_dotenv_after_environment() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let template = tmp.path().join("config.tpl");
	let env_file = tmp.path().join("vars.env");
	std::fs::write(&template, "a=${ENV2CFG_A}\nb=${ENV2CFG_B}\n")?;
	std::fs::write(&env_file, "ENV2CFG_A=file-a\nENV2CFG_B=file-b\n")?;

	common::env2cfg_cmd()
		.env("ENV2CFG_A", "env-a")
		.env_remove("ENV2CFG_B")
		.arg("--ignore-perm")
		.arg(&template)
		.arg(&env_file)
		.assert()
		.success()
		.stdout("a=env-a\nb=file-b\n");

	Ok(())
}

#[test]
fn render_override_flag_ignores_environment() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let template = tmp.path().join("config.tpl");
	let env_file = tmp.path().join("vars.env");
	std::fs::write(&template, "a=${ENV2CFG_A}\nb=${ENV2CFG_B}\n")?;
	std::fs::write(&env_file, "ENV2CFG_A=file-a\n")?;

	common::env2cfg_cmd()
		.env("ENV2CFG_A", "env-a")
		.env("ENV2CFG_B", "env-b")
		.arg("-E")
		.arg("-I")
		.arg(&template)
		.arg(&env_file)
		.assert()
		.code(1)
		.stdout("a=file-a\nb=${ENV2CFG_B}\n")
		.stderr(predicates::str::contains("no matching key for ENV2CFG_B"));

	Ok(())
}

#[test]
fn render_warns_and_fails_on_unresolved_placeholder() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let template = tmp.path().join("config.tpl");
	std::fs::write(
		&template,
		"user: ${ENV2CFG_MISSING_USER}\nhost: ${ENV2CFG_HOST}\n",
	)?;

	common::env2cfg_cmd()
		.env_remove("ENV2CFG_MISSING_USER")
		.env("ENV2CFG_HOST", "broker")
		.arg(&template)
		.assert()
		.code(1)
		.stdout("user: ${ENV2CFG_MISSING_USER}\nhost: broker\n")
		.stderr(predicates::str::contains(
			"----------------------------------------------------------------------------",
		))
		.stderr(predicates::str::contains(
			"but not found in any environment input:",
		))
		.stderr(predicates::str::contains(
			"no matching key for ENV2CFG_MISSING_USER",
		));

	Ok(())
}

#[test]
fn render_quiet_hides_warnings() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let template = tmp.path().join("config.tpl");
	std::fs::write(&template, "user: ${ENV2CFG_MISSING_USER}\n")?;

	common::env2cfg_cmd()
		.env_remove("ENV2CFG_MISSING_USER")
		.arg("--quiet")
		.arg(&template)
		.assert()
		.success()
		.stdout("user: ${ENV2CFG_MISSING_USER}\n")
		.stderr(predicates::str::contains("no matching key").not());

	Ok(())
}

#[test]
fn render_uses_custom_delimiters() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let template = tmp.path().join("config.tpl");
	std::fs::write(&template, "name: {{ENV2CFG_NAME}} ${ENV2CFG_NAME}\n")?;

	common::env2cfg_cmd()
		.env("ENV2CFG_NAME", "svc")
		.arg("--delim-start")
		.arg("{{")
		.arg("--delim-end")
		.arg("}}")
		.arg(&template)
		.assert()
		.success()
		.stdout("name: svc ${ENV2CFG_NAME}\n");

	Ok(())
}

#[test]
fn render_writes_output_file() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let template = tmp.path().join("config.tpl");
	let output = tmp.path().join("config.yml");
	std::fs::write(&template, "port: ${ENV2CFG_PORT}\n")?;

	common::env2cfg_cmd()
		.env("ENV2CFG_PORT", "8080")
		.arg("-e")
		.arg("UNUSED=1")
		.arg("-p")
		.arg("0600")
		.arg(&template)
		.arg("")
		.arg(&output)
		.assert()
		.success()
		.stdout(predicates::str::is_empty());

	assert_eq!(std::fs::read_to_string(&output)?, "port: 8080\n");

	#[cfg(unix)]
	{
		use std::os::unix::fs::PermissionsExt;
		let mode = std::fs::metadata(&output)?.permissions().mode() & 0o777;
		assert_eq!(mode, 0o600);
	}

	Ok(())
}

#[test]
fn render_dry_run_prints_instead_of_writing() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let template = tmp.path().join("config.tpl");
	let env_file = tmp.path().join("vars.env");
	let output = tmp.path().join("config.yml");
	std::fs::write(&template, "port: ${ENV2CFG_PORT}\n")?;
	std::fs::write(&env_file, "ENV2CFG_PORT=9090\n")?;

	common::env2cfg_cmd()
		.env_remove("ENV2CFG_PORT")
		.arg("--dry-run")
		.arg("-I")
		.arg(&template)
		.arg(&env_file)
		.arg(&output)
		.assert()
		.success()
		.stdout("port: 9090\n");

	assert!(!output.exists());

	Ok(())
}

#[cfg(unix)]
#[test]
fn render_rejects_dotenv_with_wrong_permissions() -> AnyEmptyResult {
	use std::os::unix::fs::PermissionsExt;

	let tmp = tempfile::tempdir()?;
	let template = tmp.path().join("config.tpl");
	let env_file = tmp.path().join("vars.env");
	std::fs::write(&template, "port: ${ENV2CFG_PORT}\n")?;
	std::fs::write(&env_file, "ENV2CFG_PORT=9090\n")?;
	std::fs::set_permissions(&env_file, std::fs::Permissions::from_mode(0o644))?;

	common::env2cfg_cmd()
		.arg(&template)
		.arg(&env_file)
		.assert()
		.code(2)
		.stdout(predicates::str::is_empty())
		.stderr(predicates::str::contains("doesn't"))
		.stderr(predicates::str::contains("permissions."));

	std::fs::set_permissions(&env_file, std::fs::Permissions::from_mode(0o640))?;

	common::env2cfg_cmd()
		.env_remove("ENV2CFG_PORT")
		.arg(&template)
		.arg(&env_file)
		.assert()
		.success()
		.stdout("port: 9090\n");

	Ok(())
}

#[test]
fn render_fails_for_missing_template() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::env2cfg_cmd()
		.arg(tmp.path().join("missing.tpl"))
		.assert()
		.code(2)
		.stdout(predicates::str::is_empty())
		.stderr(predicates::str::contains("template"));

	Ok(())
}
