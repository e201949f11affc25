use serde::Deserialize;

/// Permission scope identifiers as stored in the `permissions` table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "i64")]
pub enum ScopeId {
	SiteAccess,
	Admin,
	ReadWriteActivityReports,
	ReadActivityReports,
	ApproveActivityReports,
	UnlockApprovedReports,
	ReadWriteTrainingReports,
	PocTrainingReports,
}
impl ScopeId {
	pub const fn id(self) -> i64 {
		match self {
			Self::SiteAccess => 1,
			Self::Admin => 2,
			Self::ReadWriteActivityReports => 3,
			Self::ReadActivityReports => 4,
			Self::ApproveActivityReports => 5,
			Self::UnlockApprovedReports => 6,
			Self::ReadWriteTrainingReports => 7,
			Self::PocTrainingReports => 9,
		}
	}

	/// Whether the scope lets its holder read report data in the permission's region.
	pub const fn grants_read(self) -> bool {
		matches!(
			self,
			Self::ReadWriteActivityReports
				| Self::ReadActivityReports
				| Self::ApproveActivityReports
				| Self::ReadWriteTrainingReports
				| Self::PocTrainingReports
		)
	}
}
impl TryFrom<i64> for ScopeId {
	type Error = String;

	fn try_from(value: i64) -> Result<Self, Self::Error> {
		match value {
			1 => Ok(Self::SiteAccess),
			2 => Ok(Self::Admin),
			3 => Ok(Self::ReadWriteActivityReports),
			4 => Ok(Self::ReadActivityReports),
			5 => Ok(Self::ApproveActivityReports),
			6 => Ok(Self::UnlockApprovedReports),
			7 => Ok(Self::ReadWriteTrainingReports),
			9 => Ok(Self::PocTrainingReports),
			other => Err(format!("Unknown permission scope id {other}.")),
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct Permission {
	pub region_id: i64,
	pub scope_id: ScopeId,
}

/// Distinct regions readable through any of `permissions`, ascending.
pub fn readable_regions(permissions: &[Permission]) -> Vec<i64> {
	let mut regions = permissions
		.iter()
		.filter(|permission| permission.scope_id.grants_read())
		.map(|permission| permission.region_id)
		.collect::<Vec<_>>();

	regions.sort_unstable();
	regions.dedup();

	regions
}
