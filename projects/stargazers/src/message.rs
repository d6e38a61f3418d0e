use interfaces_github_stargazers::{RepositoryRef, StarCount};
use interfaces_slack_webhook::{Block, NotificationMessage};

pub fn format_star_message(repository: &RepositoryRef, stars: StarCount) -> NotificationMessage {
    NotificationMessage {
        blocks: vec![
            Block::header(format!(
                "⭐⭐ The {} repo has reached {stars} stars! ⭐⭐",
                repository.name
            )),
            Block::markdown_section(format!(
                "See all the new stargazers <{}|here>",
                repository.stargazers_url()
            )),
        ],
    }
}

#[cfg(test)]
mod tests {
    use interfaces_slack_webhook::TextObject;

    use super::*;

    fn prefect() -> RepositoryRef {
        RepositoryRef::new("PrefectHQ", "prefect")
    }

    #[test]
    fn header_names_repository_and_count_once() {
        let message = format_star_message(&prefect(), 5000);

        let [header, section] = message.blocks.as_slice() else {
            panic!("expected two blocks, got {:?}", message.blocks);
        };

        let Block::Header { text: TextObject::PlainText { text, emoji } } = header else {
            panic!("first block should be a plain-text header: {header:?}");
        };
        assert!(*emoji);
        assert_eq!(text.matches("5000").count(), 1);
        assert_eq!(text.matches("prefect").count(), 1);
        assert_eq!(text, "⭐⭐ The prefect repo has reached 5000 stars! ⭐⭐");

        let Block::Section { text: TextObject::Mrkdwn { text } } = section else {
            panic!("second block should be a markdown section: {section:?}");
        };
        assert!(text.contains("<https://github.com/PrefectHQ/prefect/stargazers|here>"));
        assert!(!text.contains('{'));
    }

    #[test]
    fn formatting_is_byte_identical_across_calls() {
        let first = serde_json::to_vec(&format_star_message(&prefect(), 5000)).unwrap();
        let second = serde_json::to_vec(&format_star_message(&prefect(), 5000)).unwrap();
        assert_eq!(first, second);
    }
}
