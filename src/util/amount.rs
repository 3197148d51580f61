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
use std::fmt;

/// Most fraction digits ever rendered for a euro amount.
const MAX_FRACTION_DIGITS: usize = 3;

/// A euro amount rendered the way the store's users read it (es-ES): `.`
/// groups thousands, `,` separates decimals, trailing zero decimals are
/// dropped. As in the es-ES locale, four-digit integers are left ungrouped.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Euros(pub f64);

impl Euros {
	/// Short form for chart labels, e.g. `12.3k€` or `950€`.
	pub fn compact(&self) -> String {
		if self.0 >= 1000.0 {
			format!("{:.1}k€", self.0 / 1000.0)
		} else {
			format!("{:.0}€", self.0)
		}
	}

	fn grouped(&self) -> String {
		let fixed = format!("{:.*}", MAX_FRACTION_DIGITS, self.0.abs());
		let (int_part, frac_part) =
			fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
		let frac_part = frac_part.trim_end_matches('0');

		let mut int_out = String::new();
		if int_part.len() > 4 {
			for (i, c) in int_part.chars().enumerate() {
				if i > 0 && (int_part.len() - i) % 3 == 0 {
					int_out.push('.');
				}
				int_out.push(c);
			}
		} else {
			int_out.push_str(int_part);
		}

		let sign = if self.0 < 0.0 && (int_out != "0" || !frac_part.is_empty())
		{
			"-"
		} else {
			""
		};

		if frac_part.is_empty() {
			format!("{}{}", sign, int_out)
		} else {
			format!("{}{},{}", sign, int_out, frac_part)
		}
	}
}

impl fmt::Display for Euros {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} €", self.grouped())
	}
}
