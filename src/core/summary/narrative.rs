/// 固定模板的一句话摘要
///
/// 句子按场景/活动度/配色/画质的顺序拼接, 缺失的分布直接跳过,
/// 画质句永远在场 (均分 0 也会给出 "poor")
pub fn build_narrative(
    scene: Option<&str>,
    activity: Option<&str>,
    scheme: Option<&str>,
    quality_adjective: &str,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(scene) = scene {
        parts.push(format!("The video primarily shows {} scenes", scene));
    }
    if let Some(activity) = activity {
        parts.push(format!("with {} activity levels", activity));
    }
    if let Some(scheme) = scheme {
        parts.push(format!("featuring {} color schemes", scheme));
    }
    parts.push(format!("Video quality appears {}", quality_adjective));

    format!("{}.", parts.join(". "))
}
