use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub fn env2cfg_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("env2cfg"));
	cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
	cmd
}
