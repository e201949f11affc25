use tta_domain::constants::{COMMUNICATION_METHODS, COMMUNICATION_PURPOSES, COMMUNICATION_RESULTS};

use crate::{
	association::{self, Comparator, SubqueryTemplate},
	dates::{self, DateColumn, DateTarget},
	filter::Condition,
	predicate::{ColumnRef, SqlExpr},
	primitives,
	registry::{EntityFamily, HandlerContext, Outcome, TopicRegistry},
	topics::ids,
};

const LOG_ID: ColumnRef = ColumnRef::new("CommunicationLog", "id");
const METHOD: SqlExpr = SqlExpr::Static(r#"("CommunicationLog"."data"->>'method')"#);
const PURPOSE: SqlExpr = SqlExpr::Static(r#"("CommunicationLog"."data"->>'purpose')"#);
const RESULT: SqlExpr = SqlExpr::Static(r#"("CommunicationLog"."data"->>'result')"#);
const COMMUNICATION_DATE: DateTarget = DateTarget::Column(DateColumn::Document(
	r#"("CommunicationLog"."data"->>'communicationDate')"#,
));

const AUTHOR: SubqueryTemplate = SubqueryTemplate::new(
	LOG_ID,
	"SELECT c.id FROM communication_logs c JOIN users u ON u.id = c.user_id WHERE u.name",
);
const RECIPIENT: SubqueryTemplate = SubqueryTemplate::new(
	LOG_ID,
	"SELECT clr.communication_log_id FROM communication_log_recipients clr WHERE clr.recipient_id",
);

pub fn registry() -> TopicRegistry {
	TopicRegistry::builder(EntityFamily::CommunicationLog)
		.on("communicationDate", Condition::Before, communication_date_before)
		.on("communicationDate", Condition::After, communication_date_after)
		.on("communicationDate", Condition::Within, communication_date_within)
		.on("communicationDate", Condition::In, communication_date_within)
		.on("method", Condition::In, method_in)
		.on("method", Condition::NotIn, method_nin)
		.on("purpose", Condition::In, purpose_in)
		.on("purpose", Condition::NotIn, purpose_nin)
		.on("result", Condition::In, result_in)
		.on("result", Condition::NotIn, result_nin)
		.on("creator", Condition::Contains, creator_ctn)
		.on("creator", Condition::NotContains, creator_nctn)
		.on("recipientId", Condition::In, recipient_id_in)
		.build()
}

fn communication_date_before(values: &[String], ctx: &HandlerContext) -> Outcome {
	dates::before(COMMUNICATION_DATE, values, ctx.params())
}

fn communication_date_after(values: &[String], ctx: &HandlerContext) -> Outcome {
	dates::after(COMMUNICATION_DATE, values, ctx.params())
}

fn communication_date_within(values: &[String], ctx: &HandlerContext) -> Outcome {
	dates::within(COMMUNICATION_DATE, values, ctx.params())
}

fn method_in(values: &[String], _: &HandlerContext) -> Outcome {
	primitives::allowed_exact(true, METHOD, &COMMUNICATION_METHODS, values)
}

fn method_nin(values: &[String], _: &HandlerContext) -> Outcome {
	primitives::allowed_exact(false, METHOD, &COMMUNICATION_METHODS, values)
}

fn purpose_in(values: &[String], _: &HandlerContext) -> Outcome {
	primitives::allowed_exact(true, PURPOSE, &COMMUNICATION_PURPOSES, values)
}

fn purpose_nin(values: &[String], _: &HandlerContext) -> Outcome {
	primitives::allowed_exact(false, PURPOSE, &COMMUNICATION_PURPOSES, values)
}

fn result_in(values: &[String], _: &HandlerContext) -> Outcome {
	primitives::allowed_exact(true, RESULT, &COMMUNICATION_RESULTS, values)
}

fn result_nin(values: &[String], _: &HandlerContext) -> Outcome {
	primitives::allowed_exact(false, RESULT, &COMMUNICATION_RESULTS, values)
}

fn creator_ctn(values: &[String], ctx: &HandlerContext) -> Outcome {
	Ok(association::filter_association(AUTHOR, values, false, Comparator::Matches, ctx.params()))
}

fn creator_nctn(values: &[String], ctx: &HandlerContext) -> Outcome {
	Ok(association::filter_association(AUTHOR, values, true, Comparator::Matches, ctx.params()))
}

fn recipient_id_in(values: &[String], ctx: &HandlerContext) -> Outcome {
	Ok(association::filter_association_ids(RECIPIENT, &ids(values)?, false, ctx.params()))
}

#[cfg(test)]
mod tests {
	use crate::{
		filter::Condition,
		registry::{HandlerContext, Ignored},
		topics::communication_logs,
	};

	fn run(topic: &str, condition: Condition, values: &[&str]) -> Result<String, Ignored> {
		let values = values.iter().map(|value| value.to_string()).collect::<Vec<_>>();
		let handler =
			communication_logs::registry().handler(topic, condition).expect("registered handler");

		handler(&values, &HandlerContext::default()).map(|predicate| predicate.render())
	}

	#[test]
	fn in_behaves_like_within() {
		assert_eq!(
			run("communicationDate", Condition::In, &["2024/01/01-2024/01/31"]),
			run("communicationDate", Condition::Within, &["2024/01/01 - 2024/01/31"])
		);
	}

	#[test]
	fn methods_are_allow_listed() {
		assert_eq!(run("method", Condition::In, &["Carrier pigeon"]), Err(Ignored::NoValidValues));
		assert_eq!(
			run("method", Condition::NotIn, &["Phone"]).expect("predicate"),
			r#"(("CommunicationLog"."data"->>'method') IS NULL OR ("CommunicationLog"."data"->>'method') NOT IN ('Phone'))"#
		);
	}
}
