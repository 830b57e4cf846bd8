//! System prompt templates of the pipeline steps and their rendering.
//!
//! Templates use `{placeholder}` markers filled from `PipelineState` by
//! [`render`]: `{chat_history}`, `{data_requirements}`, `{generated_prompt}`,
//! `{sql_query}`, `{execution_results}`, `{members}` and `{options}`. Unknown
//! markers are left as they are.

use crate::state::PipelineState;

/// Collects the user's data requirements, asking follow-up questions while they are incomplete.
pub const DATA_GATHER_INFORMATION_PROMPT: &str = r#"Your job is to collect the user's data requirements and expectations so a query prompt can be written for them.
Use the tool 'fetch_metadata_as_json' to learn which schemas, tables and columns the database offers. Each metadata record looks like:
{"schema_name": "main", "table_name": "employees", "column_name": "employee_id", "data_type": "INTEGER", "column_description": null, "constraint_name": "employees_pkey", "constraint_type": "PRIMARY KEY"}

Here is the chat history, use it to gather the data requirements:
{chat_history}

Gather the following information:
1. Purpose of the data: why the user needs it and which decision or analysis it supports.
2. Specific data needs: the data points the user is interested in (e.g. sales figures, customer demographics).
3. Time frame: the period of interest (e.g. last month, Q1 2024).
4. Filters/criteria: conditions to apply (e.g. region, product category).

If anything is missing or unclear, ask the user one clarifying question and nothing else.

Once all information is collected, output only this JSON object, without code fences or extra text:
{"purpose_of_data": "...", "specific_data_needs": "...", "time_frame": "...", "filters_criteria": "..."}"#;

/// Turns the recorded requirements into a natural-language prompt for SQL generation.
pub const DATA_PROMPT_GENERATOR_PROMPT: &str = r#"You write precise prompts for a SQL-writing assistant.
Using the recorded data requirements below, write one natural-language request that states exactly which data to retrieve, over which time frame and with which filters.

Data requirements:
{data_requirements}

Chat history:
{chat_history}

Output only the prompt text."#;

/// Writes one SQL query for the generated prompt.
pub const SQL_GENERATION_PROMPT: &str = r#"You are an expert SQL developer working against a SQLite database.
Use the tool 'fetch_metadata_as_json' to check table and column names before writing the query.

Write one read-only SELECT statement that answers this request:
{generated_prompt}

Data requirements:
{data_requirements}

Output only the SQL statement, without explanation."#;

/// Runs the generated query through the execution tool.
pub const SQL_EXECUTION_PROMPT: &str = r#"You execute SQL queries against the database.
Call the tool 'execute_sql' exactly once with this query:
{sql_query}

Then output only the JSON result returned by the tool."#;

/// Presents the execution results to the user.
pub const SQL_RESULT_FORMATTING_PROMPT: &str = r#"You present query results to a business user.
The user asked for:
{generated_prompt}

The query that was run:
{sql_query}

The raw results (JSON):
{execution_results}

Answer the user's request with a short summary followed by a readable table of the results. If there are no rows, say so plainly."#;

/// Routes within the data-requirements team.
pub const DATA_GATHER_SUPERVISOR_PROMPT: &str = r#"You are the supervisor of the data requirement gathering workflow. The workflow's steps are: {members}.
Here is the chat history:
{chat_history}

Your options:
- data_gather_information: collect (more) data requirements from the user.
- data_prompt_generator: the requirements are complete; generate the query prompt.
- FINISH: data_gather_information asked the user a question; hand it back to the user.

Recorded data requirements:
{data_requirements}

Example: the user says "I need data on customer demographics for the last quarter." and data_gather_information answers "Could you please provide more details about the specific data points you are interested in?". Answer: FINISH

Given the conversation above, who should act next? Answer with exactly one of: {options}"#;

/// Decides whether the generated prompt is ready for SQL generation.
pub const DATA_PROMPT_SUPERVISOR_PROMPT: &str = r#"You are the supervisor between prompt generation and SQL generation. The workflow's steps are: {members}.
The generated prompt is:
{generated_prompt}

Data requirements:
{data_requirements}

If the prompt states clearly which data to retrieve, choose sql_generation. If it is incomplete or contradicts the requirements, choose data_prompt_generator to rewrite it.

Answer with exactly one of: {options}"#;

/// Reviews the SQL team's work once results are formatted.
pub const SQL_SUPERVISOR_PROMPT: &str = r#"You are the supervisor of the SQL team. The workflow's steps are: {members}.
Generated query:
{sql_query}

Execution results:
{execution_results}

If the formatted answer satisfies the request, choose FINISH. Otherwise choose the step that should act next.

Answer with exactly one of: {options}"#;

/// Placeholder text for a field that has not been written yet.
const NOT_YET_AVAILABLE: &str = "(not available yet)";

/// Fills the state-derived placeholders of `template`.
///
/// `members` is the roster shown to supervisors; `options` the closed set of answers
/// they may give. Agents pass empty slices.
pub fn render(template: &str, state: &PipelineState, members: &[String], options: &[String]) -> String {
    let chat_history = if state.chat_history.is_empty() {
        "(no earlier conversation)".to_string()
    } else {
        state.chat_history.join("\n")
    };
    let data_requirements = state
        .data_requirements
        .as_ref()
        .and_then(|r| serde_json::to_string_pretty(r).ok())
        .unwrap_or_else(|| NOT_YET_AVAILABLE.to_string());
    let execution_results = state
        .execution_results
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| NOT_YET_AVAILABLE.to_string());

    let generated_prompt = or_placeholder(&state.generated_prompt);
    let sql_query = or_placeholder(&state.sql_query);
    let members = members.join(", ");
    let options = options.join(", ");

    // Single pass: substituted values are never scanned for markers again.
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after.find('}').unwrap_or(after.len());
        let value = match after.get(..close).unwrap_or("") {
            "chat_history" => Some(chat_history.as_str()),
            "data_requirements" => Some(data_requirements.as_str()),
            "generated_prompt" => Some(generated_prompt),
            "sql_query" => Some(sql_query),
            "execution_results" => Some(execution_results.as_str()),
            "members" => Some(members.as_str()),
            "options" => Some(options.as_str()),
            _ => None,
        };
        match value {
            Some(value) if close < after.len() => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn or_placeholder(s: &str) -> &str {
    if s.is_empty() {
        NOT_YET_AVAILABLE
    } else {
        s
    }
}
