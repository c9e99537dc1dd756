use std::collections::BTreeSet;

/// 已知不支持的条目集合
///
/// 运行期间保持不变，由扫描器用于跳过对应目录的匹配
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreSet {
    ignore: BTreeSet<String>,
}

impl IgnoreSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ignore: names
                .into_iter()
                .map(Into::into)
                .filter(|name: &String| !name.is_empty())
                .collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.ignore.contains(name)
    }

    /// 路径文本中是否出现任意被忽略的条目名（子串匹配）
    pub fn matches_path(&self, path: &str) -> bool {
        self.ignore.iter().any(|name| path.contains(name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.ignore.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ignore.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_path_is_substring() {
        let set = IgnoreSet::new(["Barbara"]);
        assert!(set.matches_path("/chars/Barbara/Mesh"));
        assert!(set.matches_path("/chars/Barbara_old"));
        assert!(!set.matches_path("/chars/CharA"));
    }

    #[test]
    fn test_empty_names_are_dropped() {
        // 空字符串是任何路径的子串，必须过滤掉
        let set = IgnoreSet::new(["", "Paimon"]);
        assert_eq!(set.len(), 1);
        assert!(!set.matches_path("/chars/CharA"));
    }
}
