use vergen_gitcl::{CargoBuilder, Emitter, GitclBuilder};

fn main() -> Result<(), Box<dyn std::error::Error>> {
	// Without a git checkout vergen falls back to an idempotent placeholder SHA.
	Emitter::default()
		.add_instructions(&CargoBuilder::default().target_triple(true).build()?)?
		.add_instructions(&GitclBuilder::default().sha(true).build()?)?
		.emit()?;

	Ok(())
}
