use colored::Colorize;
use manu_core::reply::TopicTable;

/// Prints the topic table in match order.
pub fn print(table: &TopicTable) {
    println!("{}", "Topics (first match wins):".bright_magenta().bold());
    for (i, topic) in table.topics().iter().enumerate() {
        println!(
            "{} {} {}",
            format!("{:>2}.", i + 1).bright_black(),
            topic.name.bright_cyan(),
            format!("({} replies)", topic.responses.len()).bright_black()
        );
        println!("    keywords: {}", topic.keywords.join(", "));
    }
    println!();
    println!("{}", "Fallback:".bright_magenta());
    println!("    {}", table.fallback());
}
