pub fn render_schema() -> String {
	expand_includes(include_str!("../../../sql/init.sql"))
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		let trimmed = line.trim();

		if let Some(path) = trimmed.strip_prefix("\\ir ") {
			match path.trim() {
				"00_extensions.sql" => out.push_str(include_str!("../../../sql/00_extensions.sql")),
				"tables/001_articles.sql" =>
					out.push_str(include_str!("../../../sql/tables/001_articles.sql")),
				"tables/002_publications.sql" =>
					out.push_str(include_str!("../../../sql/tables/002_publications.sql")),
				"tables/003_grants.sql" =>
					out.push_str(include_str!("../../../sql/tables/003_grants.sql")),
				"tables/004_patents.sql" =>
					out.push_str(include_str!("../../../sql/tables/004_patents.sql")),
				"tables/005_certifications.sql" =>
					out.push_str(include_str!("../../../sql/tables/005_certifications.sql")),
				"tables/006_profiles.sql" =>
					out.push_str(include_str!("../../../sql/tables/006_profiles.sql")),
				"tables/007_audit_logs.sql" =>
					out.push_str(include_str!("../../../sql/tables/007_audit_logs.sql")),
				_ => out.push_str(line),
			}
		} else {
			out.push_str(line);
		}

		out.push('\n');
	}

	out
}
