//! Starter library used on first run.

use super::word::{Word, WordContent};

fn seed_word(
    id: &str,
    term: &str,
    definition: &str,
    confusers: [&str; 3],
    hook_l1: &str,
    hook_l2: &str,
    comparison: &str,
) -> Word {
    Word::new(
        id,
        term,
        WordContent {
            definition: definition.to_string(),
            confusers: confusers.iter().map(|c| c.to_string()).collect(),
            hook_l1: hook_l1.to_string(),
            hook_l2: hook_l2.to_string(),
            comparison: Some(comparison.to_string()),
        },
    )
}

/// The three words a fresh install starts with.
pub fn seed_library() -> Vec<Word> {
    vec![
        seed_word(
            "1",
            "Serendipity",
            "意外发现珍宝的运气",
            ["通过努力获得的成功", "一种宁静的冥想状态", "无法避免的悲剧命运"],
            "在寻找旧地图的途中，撞见未命名的星系。",
            "源自锡兰三王子的传说，意指智慧与运气的非线性交汇。不仅仅是幸运，而是具备辨识幸运的能力。",
            "并不是单纯的好运，而是意外中的敏锐洞察。",
        ),
        seed_word(
            "2",
            "Ephemeral",
            "转瞬即逝的，短暂的",
            ["永恒不变的真理", "极其坚硬的物质", "深奥难懂的理论"],
            "朝露在日出前蒸发，美丽因其必将消亡。",
            "蜉蝣朝生暮死。希腊语 ephemeros 意为“持续一天的”。它提醒我们，存在的美学往往建立在时间的稀缺性之上。",
            "并不是虚无，而是极短时间内的极度绽放。",
        ),
        seed_word(
            "3",
            "Labyrinth",
            "错综复杂的迷宫",
            ["开阔的平原", "笔直的高速公路", "封闭的地下室"],
            "为了禁锢牛头怪，构建出无限折叠的空间。",
            "不仅仅是让人迷路的建筑，更是心理困境的具象化。每一个转角都既是出口也是死胡同。",
            "并不是简单的谜题，而是不仅迷路且无法逃脱的结构。",
        ),
    ]
}
