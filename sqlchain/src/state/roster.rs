//! Step names and the team rosters supervisors route over.

/// Collects the user's data requirements (may ask clarifying questions).
pub const DATA_GATHER_INFORMATION: &str = "data_gather_information";
/// Turns collected requirements into a natural-language prompt.
pub const DATA_PROMPT_GENERATOR: &str = "data_prompt_generator";
pub const DATA_GATHER_SUPERVISOR: &str = "data_gather_supervisor";
pub const DATA_PROMPT_SUPERVISOR: &str = "data_prompt_supervisor";
pub const SQL_GENERATION: &str = "sql_generation";
pub const SQL_EXECUTION: &str = "sql_execution";
pub const SQL_RESULT_FORMATTING: &str = "sql_result_formatting";
pub const SQL_SUPERVISOR: &str = "sql_supervisor";

/// Terminal routing outcome written to `next` by a supervisor.
pub const FINISH: &str = "FINISH";

/// Immutable team configuration handed to supervisors at construction.
///
/// Shared by every run of a compiled graph; never copied into per-run state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRoster {
    /// Requirement-gathering team, in workflow order.
    pub data_team_members: Vec<String>,
    /// SQL team, in workflow order.
    pub sql_team_members: Vec<String>,
}

impl TeamRoster {
    /// Every member of both teams, data team first.
    pub fn team_members(&self) -> Vec<String> {
        self.data_team_members
            .iter()
            .chain(self.sql_team_members.iter())
            .cloned()
            .collect()
    }
}

impl Default for TeamRoster {
    fn default() -> Self {
        Self {
            data_team_members: vec![
                DATA_GATHER_INFORMATION.to_string(),
                DATA_PROMPT_GENERATOR.to_string(),
            ],
            sql_team_members: vec![
                SQL_GENERATION.to_string(),
                SQL_EXECUTION.to_string(),
                SQL_RESULT_FORMATTING.to_string(),
            ],
        }
    }
}
