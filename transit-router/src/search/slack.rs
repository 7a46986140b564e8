//! Board, alight and transfer slack, mirrored for reverse searches.

use super::{SearchDirection, SlackParams};

#[derive(Debug, Clone)]
pub struct SlackProvider {
    transfer_slack: i32,
    board_slack: Vec<i32>,
    alight_slack: Vec<i32>,
}

impl SlackProvider {
    /// In a reverse search a real alighting is the search's boarding, so
    /// the two slack tables swap places.
    pub fn new(params: &SlackParams, direction: SearchDirection) -> Self {
        let (board_slack, alight_slack) = if direction.is_forward() {
            (params.board_slack.clone(), params.alight_slack.clone())
        } else {
            (params.alight_slack.clone(), params.board_slack.clone())
        };
        Self {
            transfer_slack: params.transfer_slack,
            board_slack,
            alight_slack,
        }
    }

    pub fn board_slack(&self, slack_index: usize) -> i32 {
        self.board_slack.get(slack_index).copied().unwrap_or(0)
    }

    pub fn alight_slack(&self, slack_index: usize) -> i32 {
        self.alight_slack.get(slack_index).copied().unwrap_or(0)
    }

    pub fn transfer_slack(&self) -> i32 {
        self.transfer_slack
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slack_per_index_and_direction() {
        let params = SlackParams {
            transfer_slack: 60,
            board_slack: vec![10, 20],
            alight_slack: vec![5],
        };

        let fwd = SlackProvider::new(&params, SearchDirection::Forward);
        assert_eq!(fwd.board_slack(1), 20);
        assert_eq!(fwd.alight_slack(0), 5);
        assert_eq!(fwd.alight_slack(1), 0);
        assert_eq!(fwd.transfer_slack(), 60);

        let rev = SlackProvider::new(&params, SearchDirection::Reverse);
        assert_eq!(rev.board_slack(0), 5);
        assert_eq!(rev.alight_slack(1), 20);
    }
}
