//! Prompt builders for the oracle.
//!
//! Verdict prompts all demand a one-key JSON object with no surrounding
//! prose; the matching parsers in [`crate::verdict`] hold the other end of
//! that contract. The drafting prompt is the only free-text one.

/// Routing prompt: pick the datasource for a question.
///
/// The curated corpus covers cybersecurity topics, so those route to the
/// vectorstore; everything else goes to web search.
pub fn route(question: &str) -> String {
    format!(
        "You are an expert at routing a user question to a vectorstore or web search. \
         Use the vectorstore for questions on cybersecurity, software vulnerabilities \
         such as buffer overflow, and adversarial attacks such as phishing. You do not \
         need to be stringent with the keywords in the question related to these topics. \
         Otherwise, use web search. Give a binary choice 'web_search' or 'vectorstore' \
         based on the question. Return a JSON with a single key 'datasource' and no \
         preamble or explanation.\n\n\
         Question to route: {question}"
    )
}

/// Relevance prompt: is this retrieved passage related to the question?
///
/// Deliberately lenient; the goal is filtering out erroneous retrievals,
/// not a strict relevance test.
pub fn relevance(question: &str, passage: &str) -> String {
    format!(
        "You are a grader assessing the relevance of a retrieved document to a user \
         question. If the document contains keywords related to the user question, \
         grade it as relevant. It does not need to be a stringent test. The goal is to \
         filter out erroneous retrievals. Give a binary score 'yes' or 'no' to indicate \
         whether the document is relevant to the question. Return a JSON with a single \
         key 'score' and no preamble or explanation.\n\n\
         Here is the retrieved document:\n\n{passage}\n\n\
         Here is the user question: {question}"
    )
}

/// Drafting prompt: answer the question from the supplied context, in a
/// form ready to paste into an email reply.
pub fn generate(question: &str, context: &str) -> String {
    format!(
        "You are an assistant for question-answering tasks. Use the following pieces \
         of retrieved context to answer the question. If you don't know the answer, \
         just say that you don't know. Answer the question in email format and keep \
         the answer concise.\n\n\
         Question: {question}\n\n\
         Context: {context}\n\n\
         Answer:"
    )
}

/// Grounding prompt: is the answer supported by these facts?
pub fn grounding(evidence: &str, generation: &str) -> String {
    format!(
        "You are a grader assessing whether an answer is grounded in and supported by \
         a set of facts. Give a binary score 'yes' or 'no' to indicate whether the \
         answer is grounded in the facts. Return a JSON with a single key 'score' and \
         no preamble or explanation.\n\n\
         Here are the facts:\n\n{evidence}\n\n\
         Here is the answer: {generation}"
    )
}

/// Resolution prompt: does the answer actually resolve the question?
pub fn resolution(question: &str, generation: &str) -> String {
    format!(
        "You are a grader assessing whether an answer is useful to resolve a question. \
         Give a binary score 'yes' or 'no' to indicate whether the answer is useful to \
         resolve the question. Return a JSON with a single key 'score' and no preamble \
         or explanation.\n\n\
         Here is the answer:\n\n{generation}\n\n\
         Here is the question: {question}"
    )
}
