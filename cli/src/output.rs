use colored::*;
use compare_core::format::response_or_placeholder;
use compare_core::{ComparisonResult, PlainMarkup, ReasoningMarkup, format_reasoning};
use pulldown_cmark::{CodeBlockKind, Event as MdEvent, HeadingLevel, Options, Parser as MdParser, Tag};

/// Reasoning labels colored the way the web demo colors them
pub struct TerminalMarkup;

impl ReasoningMarkup for TerminalMarkup {
    fn guidelines_label(&self) -> String {
        "📋 Guidelines:".truecolor(0x10, 0xb9, 0x81).bold().to_string()
    }

    fn tools_label(&self) -> String {
        "🔧 Tools:".truecolor(0x63, 0x66, 0xf1).bold().to_string()
    }

    fn paragraph_break(&self) -> String {
        "\n\n".to_string()
    }
}

/// Print a comparison: the query, both answers, then the reasoning trace
pub fn print_comparison(result: &ComparisonResult, plain: bool) {
    println!();
    println!("{}", "Comparison Results".bold().underline());
    println!();
    println!("{} {}", "📝 Query:".bold(), result.query);
    println!();

    println!("{}", "🤖 Traditional LLM".yellow().bold());
    println!("{}", render_markdown(response_or_placeholder(&result.traditional_response)));

    println!("{}", "🎯 Parlant Agent".green().bold());
    println!("{}", render_markdown(response_or_placeholder(&result.parlant_response)));

    println!("{}", "🧠 Reasoning & Guidelines".cyan().bold());
    let reasoning = if plain {
        format_reasoning(&result.reasoning, &PlainMarkup)
    } else {
        format_reasoning(&result.reasoning, &TerminalMarkup)
    };
    println!("{}", reasoning);
    println!();
}

/// Numbered demo query list, 1-based to match `--pick`
pub fn print_demo_queries(queries: &[String]) {
    if queries.is_empty() {
        println!("{}", "The backend returned no demo queries.".dimmed());
        return;
    }

    println!("{}", "Demo Queries:".yellow().bold());
    for (i, query) in queries.iter().enumerate() {
        println!("  {} {}", format!("{:>2}.", i + 1).cyan(), query);
    }
    println!();
}

pub fn print_error(message: &str) {
    eprintln!("{}", message.red());
}

/// Show usage instructions when no query or action is provided
pub fn print_usage_instructions() {
    println!("{}", "Usage:".yellow().bold());
    println!("  {}", "compare-cli \"your query\"".green().bold());
    println!("    Compare the traditional LLM and the Parlant agent on one query");
    println!();
    println!("  {}", "compare-cli -i".green().bold());
    println!("    Start an interactive comparison session");
    println!();
    println!("  {}", "compare-cli --demo".green().bold());
    println!("    List demo queries; run one with --pick <N>");
    println!();
    println!("{}", "Options:".cyan());
    println!("  --api-url <URL>  Comparison API origin (default http://localhost:5000)");
    println!("  --help           Show this help message");
    println!();
}

pub fn print_interactive_help() {
    println!("Type a query and press Enter to compare.");
    println!(
        "Commands: {} toggle demo queries, {} run demo query N, {} reset, {} check backend, {} leave.",
        ":demo".cyan(),
        ":pick N".cyan(),
        ":clear".cyan(),
        ":health".cyan(),
        "exit".cyan()
    );
    println!();
}

/// Render markdown answers for the terminal
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = MdParser::new_ext(markdown, options);

    let mut output = String::new();
    let mut in_code_block = false;
    let mut code_block_lang = String::new();
    let mut code_block_content = String::new();
    // Ordered lists carry their next number, bullets carry None
    let mut list_stack: Vec<Option<u64>> = Vec::new();
    let mut bold_depth = 0usize;

    for event in parser {
        match event {
            MdEvent::Start(Tag::Heading(level, ..)) => {
                if !output.is_empty() && !output.ends_with("\n\n") {
                    output.push('\n');
                }
                let marker = match level {
                    HeadingLevel::H1 => "#",
                    HeadingLevel::H2 => "##",
                    _ => "###",
                };
                output.push_str(&format!("{} ", marker.bright_cyan().bold()));
                bold_depth += 1;
            }
            MdEvent::End(Tag::Heading(..)) => {
                bold_depth = bold_depth.saturating_sub(1);
                output.push('\n');
            }
            MdEvent::Start(Tag::Paragraph) => {
                if list_stack.is_empty() && !output.is_empty() && !output.ends_with("\n\n") {
                    output.push('\n');
                }
            }
            MdEvent::End(Tag::Paragraph) => {
                output.push('\n');
            }
            MdEvent::Start(Tag::CodeBlock(info)) => {
                in_code_block = true;
                code_block_lang = match info {
                    CodeBlockKind::Fenced(lang) => lang.to_string(),
                    _ => String::new(),
                };
                code_block_content.clear();
            }
            MdEvent::End(Tag::CodeBlock(_)) => {
                if !code_block_lang.is_empty() {
                    output.push_str(&format!("{}:\n", code_block_lang.cyan()));
                }
                output.push_str(&"─".repeat(40).dimmed().to_string());
                output.push('\n');
                output.push_str(&code_block_content);
                output.push_str(&"─".repeat(40).dimmed().to_string());
                output.push('\n');
                in_code_block = false;
            }
            MdEvent::Start(Tag::List(start)) => {
                list_stack.push(start);
            }
            MdEvent::End(Tag::List(_)) => {
                list_stack.pop();
                if list_stack.is_empty() {
                    output.push('\n');
                }
            }
            MdEvent::Start(Tag::Item) => {
                let indent = "  ".repeat(list_stack.len().saturating_sub(1));
                let bullet = match list_stack.last_mut() {
                    Some(Some(n)) => {
                        let label = format!("{}.", n);
                        *n += 1;
                        label
                    }
                    _ => "•".to_string(),
                };
                output.push_str(&format!("{}{} ", indent, bullet.yellow()));
            }
            MdEvent::End(Tag::Item) => {
                if !output.ends_with('\n') {
                    output.push('\n');
                }
            }
            MdEvent::Start(Tag::Strong) => bold_depth += 1,
            MdEvent::End(Tag::Strong) => bold_depth = bold_depth.saturating_sub(1),
            MdEvent::Code(code) => {
                output.push_str(&format!("`{}`", code).on_bright_black().white().to_string());
            }
            MdEvent::Text(text) => {
                if in_code_block {
                    code_block_content.push_str(&text);
                } else if bold_depth > 0 {
                    output.push_str(&text.bold().to_string());
                } else {
                    output.push_str(&text);
                }
            }
            MdEvent::SoftBreak => output.push(' '),
            MdEvent::HardBreak => output.push('\n'),
            MdEvent::Rule => {
                output.push_str(&"─".repeat(40).dimmed().to_string());
                output.push('\n');
            }
            MdEvent::TaskListMarker(done) => {
                output.push_str(if done { "[x] " } else { "[ ] " });
            }
            _ => {}
        }
    }

    output
}
