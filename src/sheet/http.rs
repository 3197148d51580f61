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
use anyhow::bail;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::info;

pub struct Client {
	client: reqwest::blocking::Client,
	url: String,
}

impl Client {
	pub fn new(url: &str) -> Self {
		Client {
			client: reqwest::blocking::Client::new(),
			url: url.to_string(),
		}
	}

	/// Sends a GET and handle the response. Errors on non-2xx response codes.
	pub fn get<Q, R>(&self, query_params: Option<Q>) -> Result<R, anyhow::Error>
	where
		Q: Serialize,
		R: for<'de> Deserialize<'de>,
	{
		let mut request = self
			.client
			.request(Method::GET, &self.url)
			.header(ACCEPT, "application/json");

		if let Some(query_params) = query_params {
			request = request.query(&query_params);
		}

		info!("sending GET to {}", self.url);
		let response = request.send()?;

		// Handle non-2xx response codes
		if !response.status().is_success() {
			bail!("Request failed with status: {}", response.status());
		}

		let response_data: R = response.json()?;
		Ok(response_data)
	}

	/// Sends the body as JSON text under a plain-text content type, which
	/// script endpoints accept without a CORS preflight. Only a failure to
	/// dispatch is an error; the status is returned for the caller to judge.
	pub fn post_text<B>(&self, body: &B) -> Result<StatusCode, anyhow::Error>
	where
		B: Serialize,
	{
		let payload = serde_json::to_string(body)?;

		info!("sending POST to {}", self.url);
		let response = self
			.client
			.request(Method::POST, &self.url)
			.header(CONTENT_TYPE, "text/plain;charset=utf-8")
			.body(payload)
			.send()?;

		Ok(response.status())
	}
}
