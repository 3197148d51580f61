/* Copyright © 2024-2025 Adam Train <adam@trainrelay.net>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */
use std::env;
use std::fs;
use std::process::{Command, Output};

const BUDGETS: &str = "tests/test_data/budgets.json";
const CONFIG: &str = "tests/test_data/config.toml";

/// Runs the binary against the given budgets file.
fn run(file: &str, cmd: &str, args: Vec<&str>) -> Output {
	let all_args = [
		vec!["run", "--", "-f", file, "--config", CONFIG, cmd],
		args,
	]
	.concat();

	Command::new("cargo")
		.args(all_args)
		.output()
		.expect("Failed to execute process")
}

/// Runs the binary and returns its stdout, failing the test on error.
fn execute(cmd: &str, args: Vec<&str>) -> String {
	let output = run(BUDGETS, cmd, args);

	assert!(
		output.status.success(),
		"{} failed: {}",
		cmd,
		String::from_utf8_lossy(&output.stderr)
	);

	String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Data rows of a list report: everything between the header separator and
/// the footer.
fn list_rows(stdout: &str) -> Vec<&str> {
	let lines: Vec<&str> = stdout.lines().collect();
	lines[2..lines.len() - 2].to_vec()
}

fn scratch_copy(name: &str) -> String {
	let path = env::temp_dir().join(format!(
		"presupuestos-it-{}-{}.json",
		std::process::id(),
		name
	));
	fs::copy(BUDGETS, &path).expect("Failed to copy fixture");
	path.to_string_lossy().to_string()
}

#[test]
fn test_integration_sections() {
	let expected = fs::read_to_string("tests/test_data/sections_out.txt")
		.expect("Failed to read expected output file");
	assert_eq!(execute("sections", vec![]), expected.trim());
}

#[test]
fn test_integration_list_default_order() {
	let stdout = execute("list", vec![]);
	let rows = list_rows(&stdout);

	// newest first; the repeated 600101 row is dropped
	assert_eq!(rows.len(), 5);
	assert!(rows[0].starts_with("600105"));
	assert!(rows[4].starts_with("600101"));
	assert!(stdout.contains("5 presupuestos"));
	assert!(stdout.contains("28.325,7 €"));
}

#[test]
fn test_integration_list_rows() {
	let stdout = execute("list", vec![]);
	let rows = list_rows(&stdout);

	// legacy label, unknown seller without section
	assert!(rows[0].contains("Sin sección"));
	assert!(rows[0].contains("En curso"));
	assert!(rows[0].contains("Pendiente"));
	// directory section wins over the blank sheet cell
	let cocina = rows.iter().find(|r| r.starts_with("600102")).unwrap();
	assert!(cocina.contains("Cocinas y Armarios"));
	assert!(cocina.contains("05/11/2024"));
	assert!(cocina.contains("12/11/2024"));
	assert!(cocina.ends_with("8120 €"));
	// closed without a management date, below the threshold
	let anulado = rows.iter().find(|r| r.starts_with("600104")).unwrap();
	assert!(anulado.contains(" -- "));
	assert!(anulado.ends_with("540 €   !"));
}

#[test]
fn test_integration_list_sorted() {
	let stdout = execute("list", vec!["--sort", "total", "--asc"]);
	let rows = list_rows(&stdout);
	assert!(rows[0].starts_with("600104"));
	assert!(rows[4].starts_with("600103"));

	let stdout = execute("list", vec!["--sort", "client"]);
	let rows = list_rows(&stdout);
	assert!(rows[0].starts_with("600101"));
	assert!(rows[4].starts_with("600102"));
}

#[test]
fn test_integration_list_filters() {
	let stdout = execute("list", vec!["-s", "SAFOR"]);
	assert_eq!(list_rows(&stdout).len(), 1);
	assert!(list_rows(&stdout)[0].starts_with("600101"));

	let stdout = execute("list", vec!["-t", "PRO"]);
	assert_eq!(list_rows(&stdout).len(), 1);
	assert!(list_rows(&stdout)[0].starts_with("600103"));

	let stdout = execute("list", vec!["--status", "En curso"]);
	assert_eq!(list_rows(&stdout).len(), 2);

	let stdout = execute("list", vec!["-b", "2024-11-05", "-e", "14/11/2024"]);
	assert_eq!(list_rows(&stdout).len(), 3);

	let stdout = execute("list", vec!["--since", "2024-11-15"]);
	assert_eq!(list_rows(&stdout).len(), 1);
	assert!(list_rows(&stdout)[0].starts_with("600103"));

	// the sheet cell carries a trailing space
	let stdout = execute("list", vec!["--seller", "cerezo maybeth "]);
	assert_eq!(list_rows(&stdout).len(), 1);
	assert!(list_rows(&stdout)[0].starts_with("600102"));

	let stdout = execute("list", vec!["--section", "Jardín"]);
	assert_eq!(stdout, "No budgets match");
}

#[test]
fn test_integration_summary() {
	let stdout = execute("summary", vec![]);

	assert!(stdout.contains("4325,5 €   15.3%"));
	assert!(stdout.contains("8120 €   28.7%"));
	assert!(stdout.contains("15.340,2 €   54.2%"));
	assert!(stdout.contains("540 €    1.9%"));
	assert!(stdout.contains("28.325,7 €"));
	assert!(stdout.contains("Sin sección"));
}

#[test]
fn test_integration_summary_follows_filter() {
	let stdout = execute("summary", vec!["--section", "Sanitario"]);
	assert!(stdout.contains("540 €   100.0%"));
	assert!(!stdout.contains("Cocinas y Armarios"));
}

#[test]
fn test_integration_sellers() {
	let stdout = execute("sellers", vec![]);
	let lines: Vec<&str> = stdout.lines().collect();
	assert!(lines[2].starts_with("CASTELLO RAFAEL"));
	assert!(lines[2].ends_with("15.3k€"));
	assert!(lines[3].starts_with("cerezo maybeth"));
	assert!(lines[6].starts_with("GRAU ANDREA"));
}

#[test]
fn test_integration_show() {
	let stdout = execute("show", vec!["600103"]);
	assert!(stdout.contains("Multiacto       M-600103"));
	assert!(stdout.contains("Tipo vendedor   PRO"));
	assert!(stdout.contains("Cliente PRO     PRO Cartera"));
	assert!(stdout.contains("Disponible      15/11/2024"));
	assert!(stdout.contains("Total           15.340,2 €"));
}

#[test]
fn test_integration_show_unknown() {
	let output = run(BUDGETS, "show", vec!["999999"]);
	assert!(!output.status.success());

	let output = run(BUDGETS, "show", vec![]);
	assert!(!output.status.success());
}

#[test]
fn test_integration_update() {
	let file = scratch_copy("update");

	let output = run(
		&file,
		"update",
		vec!["600101", "--set-status", "Gestionando", "--notes", "Llamar"],
	);
	assert!(output.status.success());
	assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "Saved 600101");

	let output = run(&file, "show", vec!["600101"]);
	let stdout = String::from_utf8_lossy(&output.stdout);
	assert!(stdout.contains("Estado          Gestionando"));
	assert!(stdout.contains("Notas           Llamar"));
	assert!(!stdout.contains("Pendiente"));

	// notes are kept when not given
	let output =
		run(&file, "update", vec!["600101", "--set-status", "Transformado"]);
	assert!(output.status.success());
	let output = run(&file, "show", vec!["600101"]);
	let stdout = String::from_utf8_lossy(&output.stdout);
	assert!(stdout.contains("Estado          Transformado"));
	assert!(stdout.contains("Notas           Llamar"));

	fs::remove_file(file).unwrap();
}

#[test]
fn test_integration_update_rejected() {
	let file = scratch_copy("rejected");

	let output =
		run(&file, "update", vec!["999999", "--set-status", "Anulado"]);
	assert!(!output.status.success());

	let output =
		run(&file, "update", vec!["600101", "--set-status", "Pendiente"]);
	assert!(!output.status.success());

	let output = run(&file, "update", vec!["600101"]);
	assert!(!output.status.success());

	// an unreadable store shows sample data, which must not be edited
	let output = run(
		"tests/test_data/missing.json",
		"update",
		vec!["513497", "--set-status", "Gestionando"],
	);
	assert!(!output.status.success());

	assert_eq!(
		fs::read_to_string(&file).unwrap(),
		fs::read_to_string(BUDGETS).unwrap()
	);
	fs::remove_file(file).unwrap();
}

#[test]
fn test_integration_sample_fallback() {
	let output = run("tests/test_data/missing.json", "list", vec![]);
	assert!(output.status.success());

	let stdout = String::from_utf8_lossy(&output.stdout);
	assert!(stdout.contains("513497"));
	assert!(stdout.contains("5 presupuestos"));
}

#[test]
fn test_integration_bad_flags() {
	let output = run(BUDGETS, "list", vec!["--sort", "colour"]);
	assert!(!output.status.success());

	let output = run(BUDGETS, "list", vec!["--status", "Perdido"]);
	assert!(!output.status.success());
}
