pub fn render_schema() -> String {
	expand_includes(include_str!("../../../sql/init.sql"))
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		let trimmed = line.trim();

		if let Some(path) = trimmed.strip_prefix("\\ir ") {
			match path.trim() {
				"tables/001_regions.sql" =>
					out.push_str(include_str!("../../../sql/tables/001_regions.sql")),
				"tables/002_users.sql" =>
					out.push_str(include_str!("../../../sql/tables/002_users.sql")),
				"tables/003_permissions.sql" =>
					out.push_str(include_str!("../../../sql/tables/003_permissions.sql")),
				"tables/004_recipients.sql" =>
					out.push_str(include_str!("../../../sql/tables/004_recipients.sql")),
				"tables/005_grants.sql" =>
					out.push_str(include_str!("../../../sql/tables/005_grants.sql")),
				"tables/006_other_entities.sql" =>
					out.push_str(include_str!("../../../sql/tables/006_other_entities.sql")),
				"tables/007_groups.sql" =>
					out.push_str(include_str!("../../../sql/tables/007_groups.sql")),
				"tables/008_goals.sql" =>
					out.push_str(include_str!("../../../sql/tables/008_goals.sql")),
				"tables/009_activity_reports.sql" =>
					out.push_str(include_str!("../../../sql/tables/009_activity_reports.sql")),
				"tables/010_activity_report_links.sql" =>
					out.push_str(include_str!("../../../sql/tables/010_activity_report_links.sql")),
				"tables/011_activity_report_objectives.sql" => out.push_str(include_str!(
					"../../../sql/tables/011_activity_report_objectives.sql"
				)),
				"tables/012_resources.sql" =>
					out.push_str(include_str!("../../../sql/tables/012_resources.sql")),
				"tables/013_event_reports.sql" =>
					out.push_str(include_str!("../../../sql/tables/013_event_reports.sql")),
				"tables/014_communication_logs.sql" =>
					out.push_str(include_str!("../../../sql/tables/014_communication_logs.sql")),
				"tables/015_collab_reports.sql" =>
					out.push_str(include_str!("../../../sql/tables/015_collab_reports.sql")),
				"tables/016_national_centers.sql" =>
					out.push_str(include_str!("../../../sql/tables/016_national_centers.sql")),
				_ => out.push_str(line),
			}
		} else {
			out.push_str(line);
		}

		out.push('\n');
	}

	out
}

#[cfg(test)]
mod tests {
	use crate::schema;

	#[test]
	fn every_include_is_expanded() {
		let sql = schema::render_schema();

		assert!(!sql.contains("\\ir "));
		assert!(sql.contains("CREATE TABLE IF NOT EXISTS event_report_pilots"));
		assert!(sql.contains("CREATE TABLE IF NOT EXISTS national_center_users"));
	}
}
